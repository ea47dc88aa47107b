use anyhow::Result;
use log::info;
use uuid::Uuid;

use super::{SyncError, SyncService};
use crate::entities::task;
use crate::mapping;
use crate::task::Task;

impl SyncService {
    /// Creates a new task locally and schedules a push to the backend.
    ///
    /// # Arguments
    /// * `title` - Title of the new task
    /// * `description` - Free-form description
    ///
    /// # Returns
    /// The freshly minted task id
    ///
    /// # Errors
    /// Returns an error if local storage update fails
    pub async fn create_task(&self, title: &str, description: &str) -> Result<String> {
        let id = self.dispatchers.with_default(|| Uuid::new_v4().to_string()).await?;
        let task = Task::new(id.clone(), title, description);

        info!("Storage: Creating task {}", id);
        self.with_storage(move |storage| async move { storage.upsert(task.into()).await })
            .await?;
        self.save_tasks_to_backend();

        Ok(id)
    }

    /// Replaces the title and description of an existing task.
    ///
    /// The completion flag is kept. Only local storage is consulted to find
    /// the task; no refresh happens first.
    ///
    /// # Errors
    /// Returns [`SyncError::TaskNotFound`] when no task has this id, or an
    /// error if local storage access fails
    pub async fn update_task(&self, id: &str, title: &str, description: &str) -> Result<()> {
        let mut task = self
            .get_task(id, false)
            .await?
            .ok_or_else(|| SyncError::TaskNotFound(id.to_string()))?;
        task.title = title.to_string();
        task.description = description.to_string();

        info!("Storage: Updating task {}", id);
        self.with_storage(move |storage| async move { storage.upsert(task.into()).await })
            .await?;
        self.save_tasks_to_backend();
        Ok(())
    }

    /// Marks a task as completed. Unknown ids are ignored.
    pub async fn complete_task(&self, id: &str) -> Result<()> {
        self.set_completed(id, true).await
    }

    /// Marks a task as active again. Unknown ids are ignored.
    pub async fn activate_task(&self, id: &str) -> Result<()> {
        self.set_completed(id, false).await
    }

    /// Deletes every completed task.
    pub async fn clear_completed_tasks(&self) -> Result<()> {
        let removed = self
            .with_storage(|storage| async move { storage.delete_completed().await })
            .await?;
        info!("Storage: Cleared {} completed tasks", removed);
        self.save_tasks_to_backend();
        Ok(())
    }

    /// Deletes every task.
    pub async fn delete_all_tasks(&self) -> Result<()> {
        let removed = self
            .with_storage(|storage| async move { storage.delete_all().await })
            .await?;
        info!("Storage: Deleted all {} tasks", removed);
        self.save_tasks_to_backend();
        Ok(())
    }

    /// Deletes a single task.
    pub async fn delete_task(&self, id: &str) -> Result<()> {
        let owned_id = id.to_string();
        let removed = self
            .with_storage(move |storage| async move { storage.delete_by_id(&owned_id).await })
            .await?;
        info!("Storage: Deleted task {} ({} row)", id, removed);
        self.save_tasks_to_backend();
        Ok(())
    }

    /// Retrieves all tasks, optionally refreshing from the backend first.
    ///
    /// # Errors
    /// Returns an error if the refresh or local storage access fails
    pub async fn get_tasks(&self, force_update: bool) -> Result<Vec<Task>> {
        if force_update {
            self.refresh().await?;
        }
        let rows = self
            .with_storage(|storage| async move { storage.get_all().await })
            .await?;
        self.dispatchers.with_default(move || mapping::to_external(rows)).await
    }

    /// Retrieves one task, optionally refreshing from the backend first.
    ///
    /// # Returns
    /// `None` when no task has this id
    pub async fn get_task(&self, id: &str, force_update: bool) -> Result<Option<Task>> {
        if force_update {
            self.refresh().await?;
        }
        let owned_id = id.to_string();
        let row: Option<task::Model> = self
            .with_storage(move |storage| async move { storage.get_by_id(&owned_id).await })
            .await?;
        Ok(row.map(Task::from))
    }

    async fn set_completed(&self, id: &str, completed: bool) -> Result<()> {
        let owned_id = id.to_string();
        let affected = self
            .with_storage(move |storage| async move { storage.update_completed(&owned_id, completed).await })
            .await?;
        info!("Storage: Set completed={} on task {} ({} row)", completed, id, affected);
        self.save_tasks_to_backend();
        Ok(())
    }
}
