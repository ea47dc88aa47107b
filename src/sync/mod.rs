//! Synchronization service module.
//!
//! This module provides the [`SyncService`] struct, the repository the rest of
//! the application talks to. It keeps the local task table as the source of
//! truth and mirrors it to the remote backend:
//! - Every mutation is written locally first and awaited
//! - The whole local table is then pushed to the backend in the background
//! - [`SyncService::refresh`] replaces the local table with the remote list
//!
//! Push failures never reach the caller of the mutation that triggered them.
//! They are logged and published on [`SyncService::sync_status`].

pub mod streams;
pub mod tasks;

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{error, info};
use tokio::sync::watch;

use crate::backend::Backend;
use crate::config::SyncConfig;
use crate::mapping;
use crate::runtime::{BackgroundScope, Dispatchers};
use crate::storage::LocalStorage;

pub use streams::{TaskListStream, TaskStream};

/// Errors a caller of [`SyncService`] may want to branch on.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Task (id {0}) not found")]
    TaskNotFound(String),
}

/// Represents the outcome of the most recent background push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// No push has run yet
    Idle,
    /// A push is currently in flight
    InProgress,
    /// The last push replaced the remote list
    Success,
    /// The last push failed; the local data was kept as is
    Error {
        /// Human-readable error message describing what went wrong
        message: String,
    },
}

/// Publishes [`SyncStatus`] across overlapping pushes.
///
/// The status stays `InProgress` until the last push in flight finishes; that
/// push's outcome is what gets published.
struct PushTracker {
    in_flight: Mutex<usize>,
    status: watch::Sender<SyncStatus>,
}

impl PushTracker {
    fn new() -> Self {
        let (status, _) = watch::channel(SyncStatus::Idle);
        Self {
            in_flight: Mutex::new(0),
            status,
        }
    }

    fn begin(&self) {
        if let Ok(mut in_flight) = self.in_flight.lock() {
            *in_flight += 1;
            self.status.send_replace(SyncStatus::InProgress);
        }
    }

    fn finish(&self, outcome: SyncStatus) {
        if let Ok(mut in_flight) = self.in_flight.lock() {
            *in_flight = in_flight.saturating_sub(1);
            if *in_flight == 0 {
                self.status.send_replace(outcome);
            }
        }
    }
}

/// Service that keeps local storage and the remote backend in step.
///
/// # Example
/// ```rust,no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use tasklayer::backend::InMemoryBackend;
/// use tasklayer::config::SyncConfig;
/// use tasklayer::runtime::{BackgroundScope, Dispatchers};
/// use tasklayer::storage::LocalStorage;
/// use tasklayer::sync::SyncService;
///
/// # async fn example() -> anyhow::Result<()> {
/// let storage = Arc::new(LocalStorage::in_memory().await?);
/// let backend = Arc::new(InMemoryBackend::with_seed_tasks(Duration::from_millis(200)));
/// let service = SyncService::new(
///     storage,
///     backend,
///     Dispatchers::current(),
///     BackgroundScope::current(),
///     &SyncConfig::default(),
/// );
///
/// service.refresh().await?;
/// let id = service.create_task("Buy milk", "2%").await?;
/// let task = service.get_task(&id, false).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SyncService {
    storage: Arc<LocalStorage>,
    backend: Arc<dyn Backend>,
    dispatchers: Dispatchers,
    scope: BackgroundScope,
    push_timeout: Option<Duration>,
    pushes: Arc<PushTracker>,
}

impl SyncService {
    /// Creates a new `SyncService` from explicitly constructed collaborators.
    pub fn new(
        storage: Arc<LocalStorage>,
        backend: Arc<dyn Backend>,
        dispatchers: Dispatchers,
        scope: BackgroundScope,
        config: &SyncConfig,
    ) -> Self {
        Self {
            storage,
            backend,
            dispatchers,
            scope,
            push_timeout: config.push_timeout(),
            pushes: Arc::new(PushTracker::new()),
        }
    }

    pub fn storage(&self) -> &Arc<LocalStorage> {
        &self.storage
    }

    /// Watch the outcome of background pushes.
    pub fn sync_status(&self) -> watch::Receiver<SyncStatus> {
        self.pushes.status.subscribe()
    }

    /// Wait for every background push launched so far.
    pub async fn wait_for_pending_sync(&self) {
        self.scope.wait_idle().await;
    }

    /// Replace the local table with the remote task list.
    ///
    /// Destructive and one-directional: local rows not present remotely are
    /// gone afterwards. A push still in flight may land before or after this,
    /// whichever finishes last wins on the remote side.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be reached or local storage fails
    pub async fn refresh(&self) -> Result<()> {
        info!("🔄 Refreshing tasks from {} backend...", self.backend.backend_type());

        let remote = match self.backend.load_tasks().await {
            Ok(tasks) => {
                info!("✅ Fetched {} tasks from backend", tasks.len());
                tasks
            }
            Err(e) => {
                error!("❌ Failed to fetch tasks: {e}");
                return Err(e).context("Failed to load tasks from backend");
            }
        };

        let rows = self.dispatchers.with_default(move || mapping::to_local(remote)).await?;
        let count = rows.len();
        self.with_storage(move |storage| async move {
            storage.delete_all().await?;
            storage.upsert_all(rows).await
        })
        .await?;

        info!("✅ Stored {} tasks in database", count);
        Ok(())
    }

    /// Refresh triggered from a single task's screen; reloads everything.
    pub async fn refresh_task(&self, id: &str) -> Result<()> {
        info!("🔄 Refreshing tasks for task {}", id);
        self.refresh().await
    }

    /// Push the whole local table to the backend without waiting for it.
    pub(crate) fn save_tasks_to_backend(&self) {
        let storage = Arc::clone(&self.storage);
        let backend = Arc::clone(&self.backend);
        let dispatchers = self.dispatchers.clone();
        let pushes = Arc::clone(&self.pushes);
        let timeout = self.push_timeout;

        pushes.begin();
        self.scope.launch("save tasks to backend", async move {
            let outcome = match push_all(storage, backend, dispatchers, timeout).await {
                Ok(count) => {
                    info!("✅ Pushed {} tasks to backend", count);
                    SyncStatus::Success
                }
                Err(e) => {
                    error!("❌ Failed to push tasks to backend: {e:#}");
                    SyncStatus::Error {
                        message: format!("{e:#}"),
                    }
                }
            };
            pushes.finish(outcome);
            Ok(())
        });
    }

    /// Run a storage operation on the IO pool.
    async fn with_storage<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(Arc<LocalStorage>) -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        self.dispatchers.with_io(operation(Arc::clone(&self.storage))).await
    }
}

async fn push_all(
    storage: Arc<LocalStorage>,
    backend: Arc<dyn Backend>,
    dispatchers: Dispatchers,
    timeout: Option<Duration>,
) -> Result<usize> {
    let rows = storage.get_all().await?;
    let tasks = dispatchers.with_default(move || mapping::to_backend(rows)).await?;
    let count = tasks.len();

    let save = backend.save_tasks(tasks);
    match timeout {
        Some(limit) => tokio::time::timeout(limit, save)
            .await
            .map_err(|_| anyhow::anyhow!("Backend push timed out after {:?}", limit))??,
        None => save.await?,
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_pushes_stay_in_progress_until_last_finishes() {
        let tracker = PushTracker::new();
        let rx = tracker.status.subscribe();
        assert_eq!(*rx.borrow(), SyncStatus::Idle);

        tracker.begin();
        tracker.begin();
        tracker.finish(SyncStatus::Success);
        assert_eq!(*rx.borrow(), SyncStatus::InProgress);

        tracker.finish(SyncStatus::Error {
            message: "offline".to_string(),
        });
        assert_eq!(
            *rx.borrow(),
            SyncStatus::Error {
                message: "offline".to_string()
            }
        );
    }

    #[test]
    fn test_new_push_after_idle_reports_in_progress_again() {
        let tracker = PushTracker::new();
        let rx = tracker.status.subscribe();

        tracker.begin();
        tracker.finish(SyncStatus::Success);
        assert_eq!(*rx.borrow(), SyncStatus::Success);

        tracker.begin();
        assert_eq!(*rx.borrow(), SyncStatus::InProgress);
    }
}
