//! Per-project mutual exclusion
//!
//! The workspace directory and the conventional container/image names are
//! shared resources keyed by project id. A deployment holds its project's
//! lock from before cloning until it reaches a terminal state; a second call
//! for the same project blocks until the lock frees. Different projects
//! never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Map of project id to its deployment lock
#[derive(Clone, Default)]
pub struct ProjectLocks {
    inner: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl ProjectLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a project, waiting if a deployment is in flight
    pub async fn acquire(&self, project_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().expect("project lock map poisoned");
            map.entry(project_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
