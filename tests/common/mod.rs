#![allow(dead_code)]

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tasklayer::backend::{BackendTask, InMemoryBackend};
use tasklayer::config::SyncConfig;
use tasklayer::entities::task;
use tasklayer::runtime::{BackgroundScope, Dispatchers};
use tasklayer::storage::LocalStorage;
use tasklayer::sync::SyncService;

pub struct Harness {
    pub service: SyncService,
    pub storage: Arc<LocalStorage>,
    pub backend: Arc<InMemoryBackend>,
}

pub async fn harness_with(remote: Vec<BackendTask>) -> Harness {
    build(InMemoryBackend::with_tasks(Duration::ZERO, remote)).await
}

/// Empty backend that answers every call after `latency`.
pub async fn harness_with_latency(latency: Duration) -> Harness {
    build(InMemoryBackend::new(latency)).await
}

async fn build(backend: InMemoryBackend) -> Harness {
    let storage = Arc::new(LocalStorage::in_memory().await.unwrap());
    let backend = Arc::new(backend);
    let service = SyncService::new(
        Arc::clone(&storage),
        backend.clone(),
        Dispatchers::current(),
        BackgroundScope::current(),
        &SyncConfig::default(),
    );
    Harness {
        service,
        storage,
        backend,
    }
}

pub async fn harness() -> Harness {
    harness_with(Vec::new()).await
}

pub fn row(id: &str, title: &str, completed: bool) -> task::Model {
    task::Model {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} description"),
        is_completed: completed,
    }
}

/// Fail the test instead of hanging when an expected emission never comes.
pub async fn within<F: Future>(future: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(5), future)
        .await
        .expect("timed out waiting for emission")
}
