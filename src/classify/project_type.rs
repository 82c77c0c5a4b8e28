//! Project type enumeration
//!
//! A closed set of classification tags. Each tag carries the runtime family
//! it belongs to and the port its framework listens on by default; both feed
//! recipe synthesis and port resolution downstream.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Runtime family a project type belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeFamily {
    Node,
    Java,
    Python,
    Go,
    Ruby,
    Php,
    Static,
    Unknown,
}

/// Classification tag describing a repository's language/framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectType {
    // Frontend frameworks
    NextJs,
    React,
    Vue,
    Angular,
    Svelte,
    Nuxt,

    // Java backends
    SpringBoot,
    SpringCloud,
    Micronaut,
    Quarkus,

    // Python backends
    Django,
    Flask,
    FastApi,

    // Node backends
    Express,
    NestJs,
    Koa,

    // Go backends
    Go,
    Gin,

    // Other backends
    Rails,
    Laravel,

    // Static sites
    StaticHtml,
    Gatsby,
    Hugo,
    Jekyll,

    Unknown,
}

impl ProjectType {
    /// All known types, in no particular order
    pub const ALL: [ProjectType; 25] = [
        ProjectType::NextJs,
        ProjectType::React,
        ProjectType::Vue,
        ProjectType::Angular,
        ProjectType::Svelte,
        ProjectType::Nuxt,
        ProjectType::SpringBoot,
        ProjectType::SpringCloud,
        ProjectType::Micronaut,
        ProjectType::Quarkus,
        ProjectType::Django,
        ProjectType::Flask,
        ProjectType::FastApi,
        ProjectType::Express,
        ProjectType::NestJs,
        ProjectType::Koa,
        ProjectType::Go,
        ProjectType::Gin,
        ProjectType::Rails,
        ProjectType::Laravel,
        ProjectType::StaticHtml,
        ProjectType::Gatsby,
        ProjectType::Hugo,
        ProjectType::Jekyll,
        ProjectType::Unknown,
    ];

    /// Stable wire tag for this type
    pub fn tag(&self) -> &'static str {
        match self {
            ProjectType::NextJs => "nextjs",
            ProjectType::React => "react",
            ProjectType::Vue => "vue",
            ProjectType::Angular => "angular",
            ProjectType::Svelte => "svelte",
            ProjectType::Nuxt => "nuxt",
            ProjectType::SpringBoot => "spring-boot",
            ProjectType::SpringCloud => "spring-cloud",
            ProjectType::Micronaut => "micronaut",
            ProjectType::Quarkus => "quarkus",
            ProjectType::Django => "django",
            ProjectType::Flask => "flask",
            ProjectType::FastApi => "fastapi",
            ProjectType::Express => "express",
            ProjectType::NestJs => "nestjs",
            ProjectType::Koa => "koa",
            ProjectType::Go => "go",
            ProjectType::Gin => "gin",
            ProjectType::Rails => "rails",
            ProjectType::Laravel => "laravel",
            ProjectType::StaticHtml => "static-html",
            ProjectType::Gatsby => "gatsby",
            ProjectType::Hugo => "hugo",
            ProjectType::Jekyll => "jekyll",
            ProjectType::Unknown => "unknown",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectType::NextJs => "Next.js",
            ProjectType::React => "React",
            ProjectType::Vue => "Vue.js",
            ProjectType::Angular => "Angular",
            ProjectType::Svelte => "Svelte",
            ProjectType::Nuxt => "Nuxt.js",
            ProjectType::SpringBoot => "Spring Boot",
            ProjectType::SpringCloud => "Spring Cloud",
            ProjectType::Micronaut => "Micronaut",
            ProjectType::Quarkus => "Quarkus",
            ProjectType::Django => "Django",
            ProjectType::Flask => "Flask",
            ProjectType::FastApi => "FastAPI",
            ProjectType::Express => "Express.js",
            ProjectType::NestJs => "NestJS",
            ProjectType::Koa => "Koa",
            ProjectType::Go => "Go",
            ProjectType::Gin => "Gin",
            ProjectType::Rails => "Ruby on Rails",
            ProjectType::Laravel => "Laravel",
            ProjectType::StaticHtml => "Static HTML",
            ProjectType::Gatsby => "Gatsby",
            ProjectType::Hugo => "Hugo",
            ProjectType::Jekyll => "Jekyll",
            ProjectType::Unknown => "Unknown",
        }
    }

    /// Runtime family for this type
    pub fn runtime(&self) -> RuntimeFamily {
        match self {
            ProjectType::NextJs
            | ProjectType::React
            | ProjectType::Vue
            | ProjectType::Angular
            | ProjectType::Svelte
            | ProjectType::Nuxt
            | ProjectType::Express
            | ProjectType::NestJs
            | ProjectType::Koa
            | ProjectType::Gatsby => RuntimeFamily::Node,
            ProjectType::SpringBoot
            | ProjectType::SpringCloud
            | ProjectType::Micronaut
            | ProjectType::Quarkus => RuntimeFamily::Java,
            ProjectType::Django | ProjectType::Flask | ProjectType::FastApi => {
                RuntimeFamily::Python
            }
            ProjectType::Go | ProjectType::Gin | ProjectType::Hugo => RuntimeFamily::Go,
            ProjectType::Rails | ProjectType::Jekyll => RuntimeFamily::Ruby,
            ProjectType::Laravel => RuntimeFamily::Php,
            ProjectType::StaticHtml => RuntimeFamily::Static,
            ProjectType::Unknown => RuntimeFamily::Unknown,
        }
    }

    /// Port the framework listens on when nothing else is configured
    pub fn default_port(&self) -> u16 {
        match self {
            ProjectType::NextJs
            | ProjectType::React
            | ProjectType::Nuxt
            | ProjectType::Express
            | ProjectType::NestJs
            | ProjectType::Koa
            | ProjectType::Rails => 3000,
            ProjectType::Vue
            | ProjectType::SpringBoot
            | ProjectType::SpringCloud
            | ProjectType::Micronaut
            | ProjectType::Quarkus
            | ProjectType::Go
            | ProjectType::Gin
            | ProjectType::Unknown => 8080,
            ProjectType::Angular => 4200,
            ProjectType::Svelte | ProjectType::Flask => 5000,
            ProjectType::Django
            | ProjectType::FastApi
            | ProjectType::Laravel
            | ProjectType::Gatsby => 8000,
            ProjectType::StaticHtml => 80,
            ProjectType::Hugo => 1313,
            ProjectType::Jekyll => 4000,
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        ProjectType::ALL
            .iter()
            .find(|t| t.tag() == normalized)
            .copied()
            .ok_or_else(|| format!("unknown project type: {}", s))
    }
}

impl Serialize for ProjectType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for ProjectType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TagVisitor;

        impl Visitor<'_> for TagVisitor {
            type Value = ProjectType;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a project type tag such as \"nextjs\"")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<ProjectType, E> {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(TagVisitor)
    }
}
