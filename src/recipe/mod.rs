//! Build recipe synthesis
//!
//! Maps a [`ProjectType`] to a deterministic, parameterized Dockerfile.
//! Dispatch is a registry of generator functions rather than a branching
//! switch; new types are supported by registering a new entry.

mod templates;

use crate::classify::ProjectType;

/// Generator producing recipe text for a listening port
pub type RecipeFn = fn(u16) -> String;

/// Registry of recipe generators keyed by project type
pub struct RecipeRegistry {
    entries: Vec<(ProjectType, RecipeFn)>,
}

impl RecipeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create a registry covering every known project type
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(ProjectType::NextJs, templates::nextjs);
        registry.register(ProjectType::React, templates::react);
        registry.register(ProjectType::Vue, templates::vue);
        registry.register(ProjectType::Angular, templates::angular);
        registry.register(ProjectType::Svelte, templates::svelte);
        registry.register(ProjectType::Nuxt, templates::nuxt);

        registry.register(ProjectType::SpringBoot, templates::spring_boot);
        registry.register(ProjectType::SpringCloud, templates::spring_boot);
        registry.register(ProjectType::Micronaut, templates::micronaut);
        registry.register(ProjectType::Quarkus, templates::quarkus);

        registry.register(ProjectType::Django, templates::django);
        registry.register(ProjectType::Flask, templates::flask);
        registry.register(ProjectType::FastApi, templates::fastapi);

        registry.register(ProjectType::Express, templates::node_backend);
        registry.register(ProjectType::NestJs, templates::node_backend);
        registry.register(ProjectType::Koa, templates::node_backend);

        registry.register(ProjectType::Go, templates::golang);
        registry.register(ProjectType::Gin, templates::golang);

        registry.register(ProjectType::Rails, templates::rails);
        registry.register(ProjectType::Laravel, templates::laravel);

        registry.register(ProjectType::StaticHtml, templates::static_html);
        registry.register(ProjectType::Gatsby, templates::gatsby);
        registry.register(ProjectType::Hugo, templates::hugo);
        registry.register(ProjectType::Jekyll, templates::jekyll);

        registry
    }

    /// Register a generator for a type, replacing any existing entry
    pub fn register(&mut self, project_type: ProjectType, generator: RecipeFn) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|(ty, _)| *ty == project_type)
        {
            entry.1 = generator;
        } else {
            self.entries.push((project_type, generator));
        }
    }

    /// Render the recipe for a type and port
    ///
    /// Pure and deterministic; unregistered types (including `Unknown`) fall
    /// back to the generic recipe.
    pub fn render(&self, project_type: ProjectType, port: u16) -> String {
        self.entries
            .iter()
            .find(|(ty, _)| *ty == project_type)
            .map(|(_, generator)| generator(port))
            .unwrap_or_else(|| templates::generic(port))
    }

    /// Registered project types
    pub fn registered_types(&self) -> Vec<ProjectType> {
        self.entries.iter().map(|(ty, _)| *ty).collect()
    }
}

impl Default for RecipeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
