//! Backend abstraction layer for the remote task mirror.
//!
//! This module defines the interface the sync service uses to reach the
//! remote side, the wire representation of a task and the error type every
//! backend reports.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod memory;

pub use memory::InMemoryBackend;

/// Common error types for backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Backend error: {0}")]
    Other(String),
}

/// Completion state as the remote side encodes it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Active,
    Complete,
}

/// Wire representation of a task.
///
/// `priority` only exists remotely. Nothing on the local side carries it, so
/// it does not survive a trip through local storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendTask {
    pub id: String,
    pub title: String,
    pub short_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default)]
    pub status: TaskStatus,
}

impl BackendTask {
    pub fn new(id: impl Into<String>, title: impl Into<String>, short_description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            short_description: short_description.into(),
            priority: None,
            status: TaskStatus::Active,
        }
    }
}

/// Backend trait that every remote task store must implement.
///
/// The remote side only knows whole lists: the sync service fetches the full
/// list on refresh and replaces the full list after each local mutation.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Returns the backend type identifier (e.g., "memory").
    fn backend_type(&self) -> &str;

    /// Fetch the complete remote task list.
    async fn load_tasks(&self) -> Result<Vec<BackendTask>, BackendError>;

    /// Replace the complete remote task list.
    async fn save_tasks(&self, tasks: Vec<BackendTask>) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let mut task = BackendTask::new("PISA", "Build tower", "Ground looks good");
        task.status = TaskStatus::Complete;

        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"status\":\"COMPLETE\""));
        assert!(!json.contains("priority"));
    }

    #[test]
    fn test_missing_status_defaults_to_active() {
        let task: BackendTask =
            serde_json::from_str(r#"{"id":"1","title":"t","short_description":"d","priority":5}"#).unwrap();
        assert_eq!(task.status, TaskStatus::Active);
        assert_eq!(task.priority, Some(5));
    }
}
