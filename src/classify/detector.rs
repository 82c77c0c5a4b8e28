//! Project type detection from workspace fingerprints
//!
//! Ordered, first-match marker-file detection: the presence of a manifest
//! decides the ecosystem, then the manifest's content disambiguates the
//! framework. Manifest presence always beats content inspection of a
//! different manifest type; within one manifest the more specific framework
//! match wins over the generic fallback. Classification never fails — an
//! undecidable workspace is `Unknown`.

use super::{ProjectType, RuntimeFamily};
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Marker manifests that indicate a non-static project
const MANIFEST_MARKERS: [&str; 6] = [
    "package.json",
    "pom.xml",
    "requirements.txt",
    "go.mod",
    "Gemfile",
    "composer.json",
];

/// Classifies a source workspace into a [`ProjectType`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeClassifier;

impl TypeClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Detect the project type of a workspace
    pub fn classify(&self, workspace: &Path) -> ProjectType {
        if !workspace.is_dir() {
            warn!(path = %workspace.display(), "invalid workspace path");
            return ProjectType::Unknown;
        }

        if file_exists(workspace, "package.json") {
            return self.classify_node(workspace);
        }

        if file_exists(workspace, "pom.xml") {
            return self.classify_java(workspace);
        }

        if file_exists(workspace, "build.gradle") || file_exists(workspace, "build.gradle.kts") {
            return ProjectType::SpringBoot;
        }

        if file_exists(workspace, "requirements.txt") || file_exists(workspace, "Pipfile") {
            return self.classify_python(workspace);
        }

        if file_exists(workspace, "go.mod") {
            return self.classify_go(workspace);
        }

        if file_exists(workspace, "Gemfile") {
            return self.classify_ruby(workspace);
        }

        if file_exists(workspace, "composer.json") {
            return ProjectType::Laravel;
        }

        if file_exists(workspace, "index.html") && !self.has_manifest(workspace) {
            return ProjectType::StaticHtml;
        }

        warn!(path = %workspace.display(), "could not classify workspace");
        ProjectType::Unknown
    }

    /// Best-effort scan for an explicit port assignment
    ///
    /// Looks for `PORT=<n>` in `package.json` scripts and `server.port=<n>`
    /// in Spring's `application.properties`; falls back to the type's
    /// default port on absence or parse failure.
    pub fn detect_port(&self, workspace: &Path, project_type: ProjectType) -> u16 {
        if let Some(package_json) = read_marker(workspace, "package.json") {
            if let Some(port) = scan_port(&package_json, r"PORT\s*=\s*(\d{2,5})") {
                debug!(port, "port taken from package.json");
                return port;
            }
        }

        if let Some(props) = read_marker(workspace, "src/main/resources/application.properties") {
            if let Some(port) = scan_port(&props, r"server\.port\s*=\s*(\d{2,5})") {
                debug!(port, "port taken from application.properties");
                return port;
            }
        }

        project_type.default_port()
    }

    fn classify_node(&self, workspace: &Path) -> ProjectType {
        let Some(package_json) = read_marker(workspace, "package.json") else {
            debug!("unreadable package.json, assuming generic Node backend");
            return ProjectType::Express;
        };

        // Most specific framework first, generic runtime last.
        if package_json.contains("\"next\"") || file_exists(workspace, "next.config.js") {
            return ProjectType::NextJs;
        }
        if package_json.contains("\"@nestjs/core\"") {
            return ProjectType::NestJs;
        }
        if package_json.contains("\"nuxt\"") {
            return ProjectType::Nuxt;
        }
        if package_json.contains("\"vue\"") || file_exists(workspace, "vue.config.js") {
            return ProjectType::Vue;
        }
        if package_json.contains("\"@angular/core\"") {
            return ProjectType::Angular;
        }
        if package_json.contains("\"svelte\"") {
            return ProjectType::Svelte;
        }
        if package_json.contains("\"gatsby\"") {
            return ProjectType::Gatsby;
        }
        if package_json.contains("\"express\"") {
            return ProjectType::Express;
        }
        if package_json.contains("\"koa\"") {
            return ProjectType::Koa;
        }
        if package_json.contains("\"react\"") {
            return ProjectType::React;
        }

        debug!("no framework marker in package.json, assuming generic Node backend");
        ProjectType::Express
    }

    fn classify_java(&self, workspace: &Path) -> ProjectType {
        let Some(pom) = read_marker(workspace, "pom.xml") else {
            return ProjectType::SpringBoot;
        };

        if pom.contains("spring-cloud") {
            return ProjectType::SpringCloud;
        }
        if pom.contains("micronaut") {
            return ProjectType::Micronaut;
        }
        if pom.contains("quarkus") {
            return ProjectType::Quarkus;
        }

        ProjectType::SpringBoot
    }

    fn classify_python(&self, workspace: &Path) -> ProjectType {
        if file_exists(workspace, "manage.py") {
            return ProjectType::Django;
        }

        if let Some(requirements) = read_marker(workspace, "requirements.txt") {
            if requirements.contains("fastapi") {
                return ProjectType::FastApi;
            }
            if requirements.contains("flask") {
                return ProjectType::Flask;
            }
        }

        debug!("no framework marker in Python manifests, assuming Flask");
        ProjectType::Flask
    }

    fn classify_go(&self, workspace: &Path) -> ProjectType {
        if let Some(go_mod) = read_marker(workspace, "go.mod") {
            if go_mod.contains("github.com/gin-gonic/gin") {
                return ProjectType::Gin;
            }
        }
        ProjectType::Go
    }

    fn classify_ruby(&self, workspace: &Path) -> ProjectType {
        if file_exists(workspace, "config.ru") || file_exists(workspace, "config/application.rb") {
            return ProjectType::Rails;
        }
        if file_exists(workspace, "_config.yml") {
            return ProjectType::Jekyll;
        }
        ProjectType::Rails
    }

    fn has_manifest(&self, workspace: &Path) -> bool {
        MANIFEST_MARKERS
            .iter()
            .any(|marker| file_exists(workspace, marker))
    }
}

fn file_exists(workspace: &Path, name: &str) -> bool {
    workspace.join(name).exists()
}

fn read_marker(workspace: &Path, name: &str) -> Option<String> {
    let path = workspace.join(name);
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(&path) {
        Ok(content) => Some(content),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read marker file");
            None
        }
    }
}

fn scan_port(text: &str, pattern: &str) -> Option<u16> {
    let re = Regex::new(pattern).ok()?;
    let captured = re.captures(text)?.get(1)?.as_str();
    captured.parse::<u16>().ok().filter(|p| *p > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ProjectType;
    use std::fs;
    use tempfile::TempDir;

    fn workspace_with(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        dir
    }

    #[test]
    fn test_empty_workspace_is_unknown() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            TypeClassifier::new().classify(dir.path()),
            ProjectType::Unknown
        );
    }

    #[test]
    fn test_missing_workspace_is_unknown() {
        assert_eq!(
            TypeClassifier::new().classify(Path::new("/nonexistent/workspace")),
            ProjectType::Unknown
        );
    }

    #[test]
    fn test_nextjs_by_dependency() {
        let dir = workspace_with(&[("package.json", r#"{"dependencies":{"next":"14.0.0"}}"#)]);
        assert_eq!(
            TypeClassifier::new().classify(dir.path()),
            ProjectType::NextJs
        );
    }

    #[test]
    fn test_nextjs_by_config_file() {
        let dir = workspace_with(&[
            ("package.json", r#"{"dependencies":{}}"#),
            ("next.config.js", "module.exports = {}"),
        ]);
        assert_eq!(
            TypeClassifier::new().classify(dir.path()),
            ProjectType::NextJs
        );
    }

    #[test]
    fn test_nestjs_beats_express() {
        let dir = workspace_with(&[(
            "package.json",
            r#"{"dependencies":{"@nestjs/core":"10.0.0","express":"4.18.0"}}"#,
        )]);
        assert_eq!(
            TypeClassifier::new().classify(dir.path()),
            ProjectType::NestJs
        );
    }

    #[test]
    fn test_react_is_node_fallback_before_generic() {
        let dir = workspace_with(&[("package.json", r#"{"dependencies":{"react":"18.2.0"}}"#)]);
        assert_eq!(
            TypeClassifier::new().classify(dir.path()),
            ProjectType::React
        );
    }

    #[test]
    fn test_bare_package_json_is_express() {
        let dir = workspace_with(&[("package.json", r#"{"name":"thing"}"#)]);
        assert_eq!(
            TypeClassifier::new().classify(dir.path()),
            ProjectType::Express
        );
    }

    #[test]
    fn test_node_manifest_beats_java_manifest() {
        // Documented tie-break: package.json presence wins over pom.xml.
        let dir = workspace_with(&[
            ("package.json", r#"{"dependencies":{"koa":"2.0.0"}}"#),
            ("pom.xml", "<project>spring-cloud</project>"),
        ]);
        assert_eq!(TypeClassifier::new().classify(dir.path()), ProjectType::Koa);
    }

    #[test]
    fn test_pom_subdetection() {
        let cases = [
            ("<project>spring-cloud-starter</project>", ProjectType::SpringCloud),
            ("<project>io.micronaut</project>", ProjectType::Micronaut),
            ("<project>io.quarkus</project>", ProjectType::Quarkus),
            ("<project>plain maven</project>", ProjectType::SpringBoot),
        ];
        for (pom, expected) in cases {
            let dir = workspace_with(&[("pom.xml", pom)]);
            assert_eq!(TypeClassifier::new().classify(dir.path()), expected);
        }
    }

    #[test]
    fn test_gradle_is_spring_boot() {
        let dir = workspace_with(&[("build.gradle.kts", "plugins {}")]);
        assert_eq!(
            TypeClassifier::new().classify(dir.path()),
            ProjectType::SpringBoot
        );
    }

    #[test]
    fn test_django_by_manage_py() {
        let dir = workspace_with(&[
            ("requirements.txt", "django==4.2"),
            ("manage.py", "#!/usr/bin/env python"),
        ]);
        assert_eq!(
            TypeClassifier::new().classify(dir.path()),
            ProjectType::Django
        );
    }

    #[test]
    fn test_fastapi_from_requirements() {
        let dir = workspace_with(&[("requirements.txt", "fastapi==0.100\nuvicorn")]);
        assert_eq!(
            TypeClassifier::new().classify(dir.path()),
            ProjectType::FastApi
        );
    }

    #[test]
    fn test_flask_from_requirements_and_default() {
        let dir = workspace_with(&[("requirements.txt", "flask==3.0")]);
        assert_eq!(
            TypeClassifier::new().classify(dir.path()),
            ProjectType::Flask
        );

        let dir = workspace_with(&[("Pipfile", "[packages]")]);
        assert_eq!(
            TypeClassifier::new().classify(dir.path()),
            ProjectType::Flask
        );
    }

    #[test]
    fn test_go_and_gin() {
        let dir = workspace_with(&[("go.mod", "module example.com/app\n\ngo 1.21\n")]);
        assert_eq!(TypeClassifier::new().classify(dir.path()), ProjectType::Go);

        let dir = workspace_with(&[(
            "go.mod",
            "module example.com/app\n\nrequire github.com/gin-gonic/gin v1.9.0\n",
        )]);
        assert_eq!(TypeClassifier::new().classify(dir.path()), ProjectType::Gin);
    }

    #[test]
    fn test_ruby_subdetection() {
        let dir = workspace_with(&[("Gemfile", "gem 'rails'"), ("config.ru", "run App")]);
        assert_eq!(
            TypeClassifier::new().classify(dir.path()),
            ProjectType::Rails
        );

        let dir = workspace_with(&[("Gemfile", "gem 'jekyll'"), ("_config.yml", "title: blog")]);
        assert_eq!(
            TypeClassifier::new().classify(dir.path()),
            ProjectType::Jekyll
        );

        let dir = workspace_with(&[("Gemfile", "gem 'sinatra'")]);
        assert_eq!(
            TypeClassifier::new().classify(dir.path()),
            ProjectType::Rails
        );
    }

    #[test]
    fn test_composer_is_laravel() {
        let dir = workspace_with(&[("composer.json", r#"{"require":{}}"#)]);
        assert_eq!(
            TypeClassifier::new().classify(dir.path()),
            ProjectType::Laravel
        );
    }

    #[test]
    fn test_bare_index_html_is_static() {
        let dir = workspace_with(&[("index.html", "<html></html>")]);
        assert_eq!(
            TypeClassifier::new().classify(dir.path()),
            ProjectType::StaticHtml
        );
    }

    #[test]
    fn test_index_html_with_manifest_is_not_static() {
        let dir = workspace_with(&[
            ("index.html", "<html></html>"),
            ("package.json", r#"{"dependencies":{"vue":"3.0.0"}}"#),
        ]);
        assert_eq!(TypeClassifier::new().classify(dir.path()), ProjectType::Vue);
    }

    #[test]
    fn test_detect_port_from_package_json() {
        let dir = workspace_with(&[(
            "package.json",
            r#"{"scripts":{"start":"PORT=4321 node server.js"}}"#,
        )]);
        assert_eq!(
            TypeClassifier::new().detect_port(dir.path(), ProjectType::Express),
            4321
        );
    }

    #[test]
    fn test_detect_port_from_application_properties() {
        let dir = workspace_with(&[(
            "src/main/resources/application.properties",
            "server.port=9090\nspring.application.name=demo\n",
        )]);
        assert_eq!(
            TypeClassifier::new().detect_port(dir.path(), ProjectType::SpringBoot),
            9090
        );
    }

    #[test]
    fn test_detect_port_falls_back_to_default() {
        let dir = workspace_with(&[("package.json", r#"{"dependencies":{"next":"14"}}"#)]);
        assert_eq!(
            TypeClassifier::new().detect_port(dir.path(), ProjectType::NextJs),
            3000
        );
    }

    #[test]
    fn test_detect_port_ignores_garbage() {
        let dir = workspace_with(&[(
            "package.json",
            r#"{"scripts":{"start":"PORT=notanumber node server.js"}}"#,
        )]);
        assert_eq!(
            TypeClassifier::new().detect_port(dir.path(), ProjectType::Express),
            3000
        );
    }
}
