//! Live task queries in domain form.

use crate::entities::task;
use crate::mapping;
use crate::storage::{Emission, Subscription};
use crate::sync::SyncService;
use crate::task::Task;

/// Live list of every task.
#[derive(Debug)]
pub struct TaskListStream {
    inner: Subscription<Vec<task::Model>>,
}

impl TaskListStream {
    pub(crate) fn new(inner: Subscription<Vec<task::Model>>) -> Self {
        Self { inner }
    }

    /// Next snapshot; `None` once storage has been dropped.
    pub async fn next(&mut self) -> Option<Emission<Vec<Task>>> {
        self.inner.recv().await.map(|emission| emission.map(mapping::to_external))
    }
}

/// Live view of a single task. `None` while the task does not exist.
#[derive(Debug)]
pub struct TaskStream {
    inner: Subscription<Option<task::Model>>,
}

impl TaskStream {
    pub async fn next(&mut self) -> Option<Emission<Option<Task>>> {
        self.inner
            .recv()
            .await
            .map(|emission| emission.map(|row| row.map(Task::from)))
    }
}

impl SyncService {
    /// Subscribe to the full task list. The first item is the current list.
    pub async fn get_tasks_stream(&self) -> TaskListStream {
        TaskListStream::new(self.storage().observe_all().await)
    }

    /// Subscribe to one task. The first item is its current state.
    pub async fn get_task_stream(&self, id: &str) -> TaskStream {
        TaskStream {
            inner: self.storage().observe_by_id(id).await,
        }
    }
}
