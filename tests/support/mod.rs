//! Shared test doubles for pipeline integration tests

use async_trait::async_trait;
use berth::errors::DeployError;
use berth::runtime::{container_name, image_tag, ContainerEngine, ContainerStats};
use berth::source::SourceFetcher;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Step at which the mock engine injects a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Nothing,
    Build,
    Start,
}

#[derive(Default)]
pub struct EngineState {
    /// Container name -> running flag
    pub containers: HashMap<String, bool>,
    pub images: HashSet<String>,
    /// Ordered operation trace, e.g. "build:proj", "stop:berth-proj"
    pub events: Vec<String>,
    /// Probes that report not-running before the container comes up
    pub warmup_probes: u32,
    /// Projects currently inside a build (same-project overlap detector)
    active_builds: HashSet<String>,
}

/// In-memory [`ContainerEngine`] with failure injection
pub struct MockEngine {
    pub state: Mutex<EngineState>,
    pub fail_at: FailAt,
    /// Whether a started container ever reports itself running
    pub healthy: bool,
    /// Artificial build duration, for serialization tests
    pub build_delay: Duration,
    pub overlap_detected: AtomicBool,
}

impl MockEngine {
    pub fn healthy() -> Self {
        Self::new(FailAt::Nothing, true)
    }

    pub fn new(fail_at: FailAt, healthy: bool) -> Self {
        Self {
            state: Mutex::new(EngineState::default()),
            fail_at,
            healthy,
            build_delay: Duration::ZERO,
            overlap_detected: AtomicBool::new(false),
        }
    }

    pub fn with_build_delay(mut self, delay: Duration) -> Self {
        self.build_delay = delay;
        self
    }

    pub fn with_warmup_probes(self, probes: u32) -> Self {
        self.state.lock().unwrap().warmup_probes = probes;
        self
    }

    /// Pre-seed a container as if a prior deployment left it behind
    pub fn seed_container(&self, name: &str, running: bool) {
        self.state
            .lock()
            .unwrap()
            .containers
            .insert(name.to_string(), running);
    }

    pub fn container_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .state
            .lock()
            .unwrap()
            .containers
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn events(&self) -> Vec<String> {
        self.state.lock().unwrap().events.clone()
    }

    fn record(&self, event: String) {
        self.state.lock().unwrap().events.push(event);
    }
}

#[async_trait]
impl ContainerEngine for MockEngine {
    async fn build_image(
        &self,
        project_id: &str,
        workspace: &Path,
        recipe: &str,
    ) -> Result<String, DeployError> {
        assert!(workspace.exists(), "build ran without a workspace");
        assert!(!recipe.is_empty(), "build ran without a recipe");

        {
            let mut state = self.state.lock().unwrap();
            if !state.active_builds.insert(project_id.to_string()) {
                self.overlap_detected.store(true, Ordering::SeqCst);
            }
        }
        if !self.build_delay.is_zero() {
            tokio::time::sleep(self.build_delay).await;
        }
        self.state
            .lock()
            .unwrap()
            .active_builds
            .remove(project_id);

        self.record(format!("build:{}", project_id));
        if self.fail_at == FailAt::Build {
            return Err(DeployError::Build("simulated build failure".to_string()));
        }

        self.state
            .lock()
            .unwrap()
            .images
            .insert(image_tag(project_id));
        Ok(format!("sha256:mock-{}", project_id))
    }

    async fn start_container(
        &self,
        project_id: &str,
        _image_ref: &str,
        _port: u16,
        _env: &BTreeMap<String, String>,
        memory_mb: i64,
    ) -> Result<String, DeployError> {
        assert!(memory_mb > 0, "container started without a memory ceiling");

        let name = container_name(project_id);
        self.record(format!("start:{}", name));
        if self.fail_at == FailAt::Start {
            return Err(DeployError::Runtime(
                "simulated start failure".to_string(),
            ));
        }

        // Conventional-name reuse: any prior holder is replaced.
        self.state
            .lock()
            .unwrap()
            .containers
            .insert(name.clone(), true);
        Ok(name)
    }

    async fn stop_container(&self, container_ref: &str) -> Result<(), DeployError> {
        self.record(format!("stop:{}", container_ref));
        if let Some(running) = self
            .state
            .lock()
            .unwrap()
            .containers
            .get_mut(container_ref)
        {
            *running = false;
        }
        Ok(())
    }

    async fn remove_container(&self, container_ref: &str) -> Result<(), DeployError> {
        self.record(format!("remove:{}", container_ref));
        self.state.lock().unwrap().containers.remove(container_ref);
        Ok(())
    }

    async fn remove_image(&self, project_id: &str) -> Result<(), DeployError> {
        self.record(format!("rmi:{}", project_id));
        self.state
            .lock()
            .unwrap()
            .images
            .remove(&image_tag(project_id));
        Ok(())
    }

    async fn restart_container(&self, container_ref: &str) -> Result<(), DeployError> {
        self.record(format!("restart:{}", container_ref));
        match self
            .state
            .lock()
            .unwrap()
            .containers
            .get_mut(container_ref)
        {
            Some(running) => {
                *running = true;
                Ok(())
            }
            None => Err(DeployError::Runtime(format!(
                "no such container: {}",
                container_ref
            ))),
        }
    }

    async fn is_healthy(&self, container_ref: &str) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.warmup_probes > 0 {
            state.warmup_probes -= 1;
            return false;
        }
        self.healthy && state.containers.get(container_ref).copied().unwrap_or(false)
    }

    async fn host_port(&self, container_ref: &str, _container_port: u16) -> Option<u16> {
        self.state
            .lock()
            .unwrap()
            .containers
            .contains_key(container_ref)
            .then_some(32768)
    }

    async fn logs(&self, _container_ref: &str, _tail: usize) -> Result<String, DeployError> {
        Ok("mock logs".to_string())
    }

    async fn stats(&self, container_ref: &str) -> Result<ContainerStats, DeployError> {
        let running = self
            .state
            .lock()
            .unwrap()
            .containers
            .get(container_ref)
            .copied()
            .unwrap_or(false);
        Ok(ContainerStats {
            state: if running { "running" } else { "exited" }.to_string(),
            started_at: None,
            running,
        })
    }
}

/// [`SourceFetcher`] that materializes fixture files instead of cloning
pub struct StubFetcher {
    scratch: PathBuf,
    files: Vec<(String, String)>,
    fail: bool,
}

impl StubFetcher {
    pub fn new(scratch: impl Into<PathBuf>, files: &[(&str, &str)]) -> Self {
        Self {
            scratch: scratch.into(),
            files: files
                .iter()
                .map(|(name, content)| (name.to_string(), content.to_string()))
                .collect(),
            fail: false,
        }
    }

    pub fn failing(scratch: impl Into<PathBuf>) -> Self {
        Self {
            scratch: scratch.into(),
            files: Vec::new(),
            fail: true,
        }
    }

    pub fn workspace_path(&self, project_id: &str) -> PathBuf {
        self.scratch.join(project_id)
    }
}

#[async_trait]
impl SourceFetcher for StubFetcher {
    async fn fetch(&self, _git_url: &str, project_id: &str) -> Result<PathBuf, DeployError> {
        if self.fail {
            return Err(DeployError::Source(
                "simulated clone failure".to_string(),
            ));
        }

        let workspace = self.workspace_path(project_id);
        if workspace.exists() {
            tokio::fs::remove_dir_all(&workspace).await?;
        }
        tokio::fs::create_dir_all(&workspace).await?;
        for (name, content) in &self.files {
            let path = workspace.join(name);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, content).await?;
        }
        Ok(workspace)
    }

    async fn current_revision(&self, _workspace: &Path) -> String {
        "0123456789abcdef0123456789abcdef01234567".to_string()
    }

    async fn cleanup(&self, project_id: &str) {
        let _ = tokio::fs::remove_dir_all(self.workspace_path(project_id)).await;
    }
}
