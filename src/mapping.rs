//! Conversions between the three task representations.
//!
//! * [`Task`] - the domain model handed to consumers (`to_external`)
//! * [`task::Model`] - the persisted row (`to_local`)
//! * [`BackendTask`] - the wire model (`to_backend`)
//!
//! The backend-only `priority` field is dropped on the way in and always
//! `None` on the way out.

use crate::backend::{BackendTask, TaskStatus};
use crate::entities::task;
use crate::task::Task;

impl From<Task> for task::Model {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            is_completed: task.is_completed,
        }
    }
}

impl From<task::Model> for Task {
    fn from(local: task::Model) -> Self {
        Self {
            id: local.id,
            title: local.title,
            description: local.description,
            is_completed: local.is_completed,
        }
    }
}

impl From<BackendTask> for task::Model {
    fn from(remote: BackendTask) -> Self {
        Self {
            id: remote.id,
            title: remote.title,
            description: remote.short_description,
            is_completed: remote.status == TaskStatus::Complete,
        }
    }
}

impl From<task::Model> for BackendTask {
    fn from(local: task::Model) -> Self {
        Self {
            id: local.id,
            title: local.title,
            short_description: local.description,
            priority: None,
            status: if local.is_completed {
                TaskStatus::Complete
            } else {
                TaskStatus::Active
            },
        }
    }
}

impl From<Task> for BackendTask {
    fn from(task: Task) -> Self {
        task::Model::from(task).into()
    }
}

impl From<BackendTask> for Task {
    fn from(remote: BackendTask) -> Self {
        task::Model::from(remote).into()
    }
}

pub fn to_external(rows: Vec<task::Model>) -> Vec<Task> {
    rows.into_iter().map(Task::from).collect()
}

pub fn to_local<T: Into<task::Model>>(items: Vec<T>) -> Vec<task::Model> {
    items.into_iter().map(Into::into).collect()
}

pub fn to_backend<T: Into<BackendTask>>(items: Vec<T>) -> Vec<BackendTask> {
    items.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_round_trip_through_backend_and_local() {
        let mut original = Task::new("id-1", "Title", "Description");
        original.is_completed = true;

        let remote = BackendTask::from(original.clone());
        assert_eq!(remote.status, TaskStatus::Complete);
        assert_eq!(remote.short_description, "Description");
        assert_eq!(remote.priority, None);

        let local = task::Model::from(remote);
        let back = Task::from(local);
        assert_eq!(back, original);
    }

    #[test]
    fn test_priority_is_dropped_through_local() {
        let mut remote = BackendTask::new("id-1", "Title", "Description");
        remote.priority = Some(5);

        let local = task::Model::from(remote.clone());
        let again = BackendTask::from(local);

        assert_eq!(again.priority, None);
        assert_eq!(again.id, remote.id);
        assert_eq!(again.title, remote.title);
        assert_eq!(again.short_description, remote.short_description);
        assert_eq!(again.status, remote.status);
    }

    #[test]
    fn test_active_status_maps_to_not_completed() {
        let local = task::Model::from(BackendTask::new("a", "t", "d"));
        assert!(!local.is_completed);
    }

    #[test]
    fn test_list_helpers_preserve_order() {
        let remote = vec![BackendTask::new("b", "B", "b"), BackendTask::new("a", "A", "a")];
        let local = to_local(remote);
        let external = to_external(local.clone());
        let back = to_backend(local);

        assert_eq!(external.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(back.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), ["b", "a"]);
    }
}
