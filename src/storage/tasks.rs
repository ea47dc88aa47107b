use std::sync::Arc;

use anyhow::Result;
use log::debug;

use super::db::LocalStorage;
use super::observer::{Emission, Subscription};
use crate::entities::task;
use crate::repositories::TaskRepository;

impl LocalStorage {
    /// Insert or overwrite a task.
    pub async fn upsert(&self, task: task::Model) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        TaskRepository::upsert(&self.conn, task).await?;
        self.notify().await;
        Ok(())
    }

    /// Insert or overwrite many tasks at once.
    pub async fn upsert_all(&self, tasks: Vec<task::Model>) -> Result<()> {
        if tasks.is_empty() {
            return Ok(());
        }
        let _guard = self.write_lock.lock().await;
        TaskRepository::upsert_all(&self.conn, tasks).await?;
        self.notify().await;
        Ok(())
    }

    pub async fn get_all(&self) -> Result<Vec<task::Model>> {
        TaskRepository::get_all(&self.conn).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<task::Model>> {
        TaskRepository::get_by_id(&self.conn, id).await
    }

    pub async fn count(&self) -> Result<u64> {
        TaskRepository::count(&self.conn).await
    }

    /// Set the completion flag of one task.
    ///
    /// Unknown ids are ignored: nothing is written and nobody is notified.
    /// Returns the number of rows touched.
    pub async fn update_completed(&self, id: &str, completed: bool) -> Result<u64> {
        let _guard = self.write_lock.lock().await;
        let affected = TaskRepository::update_completed(&self.conn, id, completed).await?;
        if affected == 0 {
            debug!("Storage: No task {} to mark completed={}", id, completed);
        } else {
            self.notify().await;
        }
        Ok(affected)
    }

    /// Delete one task; returns 0 or 1.
    pub async fn delete_by_id(&self, id: &str) -> Result<u64> {
        let _guard = self.write_lock.lock().await;
        let removed = TaskRepository::delete_by_id(&self.conn, id).await?;
        self.notify_if_removed(removed).await;
        Ok(removed)
    }

    /// Delete every task; returns the number removed.
    pub async fn delete_all(&self) -> Result<u64> {
        let _guard = self.write_lock.lock().await;
        let removed = TaskRepository::delete_all(&self.conn).await?;
        self.notify_if_removed(removed).await;
        Ok(removed)
    }

    /// Delete completed tasks; returns the number removed.
    pub async fn delete_completed(&self) -> Result<u64> {
        let _guard = self.write_lock.lock().await;
        let removed = TaskRepository::delete_completed(&self.conn).await?;
        self.notify_if_removed(removed).await;
        Ok(removed)
    }

    /// Live view of the whole table.
    pub async fn observe_all(&self) -> Subscription<Vec<task::Model>> {
        let _guard = self.write_lock.lock().await;
        let initial = self.snapshot().await;
        self.observers.subscribe_all(initial)
    }

    /// Live view of one row. A deleted (or never created) row shows up as `None`.
    pub async fn observe_by_id(&self, id: &str) -> Subscription<Option<task::Model>> {
        let _guard = self.write_lock.lock().await;
        let initial = TaskRepository::get_by_id(&self.conn, id).await.map_err(Arc::new);
        self.observers.subscribe_row(id, initial)
    }

    async fn notify_if_removed(&self, removed: u64) {
        if removed > 0 {
            self.notify().await;
        }
    }

    async fn snapshot(&self) -> Emission<Vec<task::Model>> {
        TaskRepository::get_all(&self.conn).await.map_err(Arc::new)
    }

    /// Re-read the table and fan it out. Caller holds `write_lock`.
    async fn notify(&self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot().await;
        self.observers.publish(snapshot);
    }
}
