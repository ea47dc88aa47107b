//! In-process backend that stands in for a remote task service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use tokio::sync::Mutex;

use super::{Backend, BackendError, BackendTask};

/// Holds one full task list and answers after an artificial latency.
///
/// Replacements are serialized by `save_lock`; reads are not.
pub struct InMemoryBackend {
    tasks: RwLock<Vec<BackendTask>>,
    save_lock: Mutex<()>,
    latency: Duration,
    offline: AtomicBool,
}

impl InMemoryBackend {
    /// Create an empty backend.
    pub fn new(latency: Duration) -> Self {
        Self::with_tasks(latency, Vec::new())
    }

    /// Create a backend holding `tasks`.
    pub fn with_tasks(latency: Duration, tasks: Vec<BackendTask>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
            save_lock: Mutex::new(()),
            latency,
            offline: AtomicBool::new(false),
        }
    }

    /// Create a backend pre-populated with the two reference records.
    pub fn with_seed_tasks(latency: Duration) -> Self {
        Self::with_tasks(latency, seed_tasks())
    }

    /// Snapshot of the held list, without latency.
    pub fn tasks(&self) -> Vec<BackendTask> {
        self.tasks.read().map(|tasks| tasks.clone()).unwrap_or_default()
    }

    /// While offline every call fails with [`BackendError::Network`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    async fn simulate_network(&self) -> Result<(), BackendError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.is_offline() {
            return Err(BackendError::Network("backend is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    fn backend_type(&self) -> &str {
        "memory"
    }

    async fn load_tasks(&self) -> Result<Vec<BackendTask>, BackendError> {
        self.simulate_network().await?;
        let tasks = self
            .tasks
            .read()
            .map_err(|_| BackendError::Other("task list lock poisoned".to_string()))?
            .clone();
        debug!("Backend: Loaded {} tasks", tasks.len());
        Ok(tasks)
    }

    async fn save_tasks(&self, tasks: Vec<BackendTask>) -> Result<(), BackendError> {
        let _guard = self.save_lock.lock().await;
        self.simulate_network().await?;

        let count = tasks.len();
        *self
            .tasks
            .write()
            .map_err(|_| BackendError::Other("task list lock poisoned".to_string()))? = tasks;
        debug!("Backend: Replaced task list with {} tasks", count);
        Ok(())
    }
}

/// The records a fresh demo backend starts with.
pub fn seed_tasks() -> Vec<BackendTask> {
    vec![
        BackendTask::new(
            "PISA",
            "Build tower in Pisa",
            "Ground looks good, no foundation work required.",
        ),
        BackendTask::new("TACOMA", "Finish bridge in Tacoma", "Found awesome girders at half the cost!"),
    ]
}
