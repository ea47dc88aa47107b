use std::sync::Arc;
use std::time::{Duration, Instant};

use tasklayer::backend::{Backend, BackendError, BackendTask, InMemoryBackend, TaskStatus};

#[tokio::test]
async fn test_seeded_backend_holds_reference_tasks() {
    let backend = InMemoryBackend::with_seed_tasks(Duration::ZERO);
    let tasks = backend.load_tasks().await.unwrap();

    assert_eq!(tasks.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), ["PISA", "TACOMA"]);
    assert!(tasks.iter().all(|t| t.status == TaskStatus::Active));
    assert_eq!(backend.backend_type(), "memory");
}

#[tokio::test]
async fn test_save_replaces_whole_list() {
    let backend = InMemoryBackend::with_seed_tasks(Duration::ZERO);
    backend
        .save_tasks(vec![BackendTask::new("NEW", "Only task", "left")])
        .await
        .unwrap();

    let tasks = backend.load_tasks().await.unwrap();
    assert_eq!(tasks, vec![BackendTask::new("NEW", "Only task", "left")]);
}

#[tokio::test]
async fn test_calls_wait_for_latency() {
    let backend = InMemoryBackend::new(Duration::from_millis(50));
    let started = Instant::now();
    backend.load_tasks().await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[tokio::test]
async fn test_concurrent_saves_are_serialized() {
    let backend = Arc::new(InMemoryBackend::new(Duration::from_millis(30)));
    let started = Instant::now();

    let first = {
        let backend = Arc::clone(&backend);
        tokio::spawn(async move { backend.save_tasks(vec![BackendTask::new("1", "a", "a")]).await })
    };
    let second = {
        let backend = Arc::clone(&backend);
        tokio::spawn(async move { backend.save_tasks(vec![BackendTask::new("2", "b", "b")]).await })
    };
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    // Each save holds the lock through its latency, so they cannot overlap
    assert!(started.elapsed() >= Duration::from_millis(60));
    assert_eq!(backend.tasks().len(), 1);
}

#[tokio::test]
async fn test_offline_backend_fails_with_network_error() {
    let backend = InMemoryBackend::with_seed_tasks(Duration::ZERO);
    backend.set_offline(true);

    assert!(matches!(backend.load_tasks().await, Err(BackendError::Network(_))));
    assert!(matches!(backend.save_tasks(Vec::new()).await, Err(BackendError::Network(_))));
    // Failed save leaves the held list alone
    assert_eq!(backend.tasks().len(), 2);

    backend.set_offline(false);
    assert!(backend.load_tasks().await.is_ok());
}
