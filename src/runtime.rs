//! Execution contexts handed to the data layer at construction.
//!
//! [`Dispatchers`] names the two pools work is scheduled on: `io` for storage
//! access and `default` for CPU-bound work such as id generation and bulk
//! mapping. [`BackgroundScope`] runs detached work that must outlive any
//! single caller.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, error};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinError;

/// Runtime handles for IO-bound and CPU-bound work.
#[derive(Clone, Debug)]
pub struct Dispatchers {
    io: Handle,
    default: Handle,
}

impl Dispatchers {
    pub fn new(io: Handle, default: Handle) -> Self {
        Self { io, default }
    }

    /// Use the ambient runtime for both pools.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        let handle = Handle::current();
        Self::new(handle.clone(), handle)
    }

    /// Run `future` on the IO pool and wait for it.
    pub async fn with_io<F, T>(&self, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        self.io.spawn(future).await.context("IO task failed to complete")?
    }

    /// Run the CPU-bound closure `work` on the default pool and wait for it.
    pub async fn with_default<F, T>(&self, work: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.default
            .spawn(async move { work() })
            .await
            .context("CPU task failed to complete")
    }
}

/// Long-lived scope for fire-and-forget work.
///
/// Tasks are independent: an error or a panic in one is logged and does not
/// affect the others. Launched tasks are never cancelled by the scope; they
/// run to completion on the runtime even if every handle to the scope is gone.
#[derive(Clone)]
pub struct BackgroundScope {
    handle: Handle,
    in_flight: Arc<watch::Sender<usize>>,
}

impl BackgroundScope {
    pub fn new(handle: Handle) -> Self {
        let (in_flight, _) = watch::channel(0);
        Self {
            handle,
            in_flight: Arc::new(in_flight),
        }
    }

    /// Scope on the ambient runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Launch `future` and return immediately.
    pub fn launch<F>(&self, name: &'static str, future: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        self.in_flight.send_modify(|count| *count += 1);

        let work = self.handle.spawn(async move {
            if let Err(e) = future.await {
                error!("❌ Background task '{}' failed: {:#}", name, e);
            }
        });

        // Supervisor: observes the outcome, so a panic only takes down its own task
        let in_flight = Arc::clone(&self.in_flight);
        self.handle.spawn(async move {
            Self::log_join(name, work.await);
            in_flight.send_modify(|count| *count = count.saturating_sub(1));
        });
        debug!("Background task '{}' launched", name);
    }

    /// Number of launched tasks that have not finished yet.
    pub fn pending(&self) -> usize {
        *self.in_flight.borrow()
    }

    /// Wait until every task launched so far, and any they launch, has finished.
    ///
    /// Dropping the returned future only stops the wait; the tasks keep running.
    pub async fn wait_idle(&self) {
        let mut in_flight = self.in_flight.subscribe();
        // The sender lives in `self`, so the channel cannot close here
        let _ = in_flight.wait_for(|count| *count == 0).await;
    }

    fn log_join(name: &str, finished: Result<(), JoinError>) {
        if let Err(e) = finished {
            if e.is_panic() {
                error!("❌ Background task '{}' panicked: {}", name, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn explode() -> Result<()> {
        panic!("boom")
    }

    #[tokio::test]
    async fn test_with_io_and_with_default_return_results() {
        let dispatchers = Dispatchers::current();

        let sum = dispatchers.with_default(|| 2 + 2).await.unwrap();
        let text = dispatchers.with_io(async { Ok("io".to_string()) }).await.unwrap();

        assert_eq!(sum, 4);
        assert_eq!(text, "io");
    }

    #[tokio::test]
    async fn test_with_io_propagates_errors() {
        let dispatchers = Dispatchers::current();
        let result = dispatchers
            .with_io(async { Err::<(), _>(anyhow::anyhow!("disk full")) })
            .await;
        assert!(result.unwrap_err().to_string().contains("disk full"));
    }

    #[tokio::test]
    async fn test_panicking_task_does_not_cancel_siblings() {
        let scope = BackgroundScope::current();
        let finished = Arc::new(AtomicBool::new(false));

        scope.launch("panics", async { explode() });
        let flag = Arc::clone(&finished);
        scope.launch("completes", async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

        tokio::time::timeout(Duration::from_secs(5), scope.wait_idle())
            .await
            .unwrap();
        assert!(finished.load(Ordering::SeqCst));
        assert_eq!(scope.pending(), 0);
    }

    #[tokio::test]
    async fn test_failing_task_is_reaped() {
        let scope = BackgroundScope::current();
        scope.launch("fails", async { Err::<(), _>(anyhow::anyhow!("nope")) });

        tokio::time::timeout(Duration::from_secs(5), scope.wait_idle())
            .await
            .unwrap();
        assert_eq!(scope.pending(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_wait_leaves_tasks_running() {
        let scope = BackgroundScope::current();
        let finished = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&finished);
        scope.launch("slow", async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

        let waited = tokio::time::timeout(Duration::from_millis(20), scope.wait_idle()).await;
        assert!(waited.is_err());
        assert_eq!(scope.pending(), 1);

        tokio::time::timeout(Duration::from_secs(5), scope.wait_idle())
            .await
            .unwrap();
        assert!(finished.load(Ordering::SeqCst));
    }
}
