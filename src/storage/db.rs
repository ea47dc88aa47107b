use anyhow::{Context, Result};
use log::{info, LevelFilter};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use tokio::sync::Mutex;

use super::observer::TaskObservers;
use crate::entities::task;

/// Local storage manager for tasks.
///
/// Owns the SeaORM connection and the subscriber registry. Every write goes
/// through `write_lock` so subscribers see changes in the order they were
/// applied.
pub struct LocalStorage {
    pub(crate) conn: DatabaseConnection,
    pub(super) observers: TaskObservers,
    pub(super) write_lock: Mutex<()>,
}

impl LocalStorage {
    /// Connect to `database_url` and make sure the schema exists.
    pub async fn new(database_url: &str) -> Result<Self> {
        let mut options = ConnectOptions::new(database_url.to_string());
        // A single connection keeps `sqlite::memory:` databases alive and shared
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(true)
            .sqlx_logging_level(LevelFilter::Debug);

        let conn = Database::connect(options)
            .await
            .with_context(|| format!("Failed to open database: {database_url}"))?;

        let storage = LocalStorage {
            conn,
            observers: TaskObservers::default(),
            write_lock: Mutex::new(()),
        };
        storage.init_schema().await?;

        info!("Storage: Opened task database at {}", database_url);
        Ok(storage)
    }

    /// Private in-memory database, mostly for tests and demos.
    pub async fn in_memory() -> Result<Self> {
        Self::new("sqlite::memory:").await
    }

    /// Create the `tasks` table if it does not exist yet.
    async fn init_schema(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);
        let statement = schema.create_table_from_entity(task::Entity).if_not_exists().to_owned();

        self.conn
            .execute(backend.build(&statement))
            .await
            .context("Failed to create tasks table")?;
        Ok(())
    }
}
