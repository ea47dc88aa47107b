use std::sync::Arc;

use anyhow::Result;
use log::info;
use tasklayer::backend::{Backend, InMemoryBackend};
use tasklayer::config::Config;
use tasklayer::logger::Logger;
use tasklayer::runtime::{BackgroundScope, Dispatchers};
use tasklayer::storage::LocalStorage;
use tasklayer::sync::SyncService;
use tasklayer::viewmodel::statistics::compute_stats;

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().any(|arg| arg == "--generate-config") {
        return Config::generate_default_config(Config::get_default_config_path()?);
    }

    let config = Config::load()?;
    config.validate()?;

    let logger = Logger::from_config(&config.logging)?;
    logger.install()?;

    // Wiring: every collaborator is built here and handed down explicitly
    let storage = Arc::new(LocalStorage::new(&config.storage.database_url).await?);
    let backend: Arc<dyn Backend> = if config.remote.seed_tasks {
        Arc::new(InMemoryBackend::with_seed_tasks(config.remote.latency()))
    } else {
        Arc::new(InMemoryBackend::new(config.remote.latency()))
    };
    let service = SyncService::new(
        storage,
        backend,
        Dispatchers::current(),
        BackgroundScope::current(),
        &config.sync,
    );

    let tasks = service.get_tasks(true).await?;
    let stats = compute_stats(&tasks);
    info!("Loaded {} tasks", tasks.len());

    println!("{}", serde_json::to_string_pretty(&tasks)?);
    println!(
        "active: {:.1}%  completed: {:.1}%",
        stats.active_percent, stats.completed_percent
    );

    service.wait_for_pending_sync().await;
    Ok(())
}
