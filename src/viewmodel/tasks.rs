//! Task list read model.
//!
//! [`TasksViewModel`] combines the live task list with three independently
//! changing inputs (filter, loading flag, one-shot user message) into a single
//! [`TasksUiState`]. A driver task recomputes the state from the latest value
//! of every input whenever any of them changes.

use anyhow::Result;
use log::{error, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::constants::{
    ERROR_LOADING_TASKS, ERROR_REFRESHING_TASKS, ICON_ACTIVE, ICON_ALL, ICON_COMPLETED, LABEL_ACTIVE, LABEL_ALL,
    LABEL_COMPLETED, MSG_COMPLETED_TASKS_CLEARED, MSG_TASK_ACTIVATED, MSG_TASK_ADDED, MSG_TASK_COMPLETED,
    MSG_TASK_DELETED, MSG_TASK_SAVED, NO_TASKS_ACTIVE, NO_TASKS_ALL, NO_TASKS_COMPLETED,
};
use crate::sync::{SyncService, TaskListStream};
use crate::task::Task;

/// Which tasks the list shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TasksFilterType {
    #[default]
    AllTasks,
    ActiveTasks,
    CompletedTasks,
}

/// Display metadata for the selected filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilteringUiInfo {
    pub current_filtering_label: &'static str,
    pub no_tasks_label: &'static str,
    pub no_task_icon: &'static str,
}

impl Default for FilteringUiInfo {
    fn default() -> Self {
        filtering_ui_info(TasksFilterType::AllTasks)
    }
}

/// Outcome reported by the add/edit screen when it closes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditResult {
    Saved,
    Added,
    Deleted,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TasksUiState {
    pub items: Vec<Task>,
    pub is_loading: bool,
    pub filtering_ui_info: FilteringUiInfo,
    pub user_message: Option<&'static str>,
}

pub fn filter_tasks(tasks: &[Task], filter: TasksFilterType) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| match filter {
            TasksFilterType::AllTasks => true,
            TasksFilterType::ActiveTasks => task.is_active(),
            TasksFilterType::CompletedTasks => task.is_completed,
        })
        .cloned()
        .collect()
}

pub fn filtering_ui_info(filter: TasksFilterType) -> FilteringUiInfo {
    match filter {
        TasksFilterType::AllTasks => FilteringUiInfo {
            current_filtering_label: LABEL_ALL,
            no_tasks_label: NO_TASKS_ALL,
            no_task_icon: ICON_ALL,
        },
        TasksFilterType::ActiveTasks => FilteringUiInfo {
            current_filtering_label: LABEL_ACTIVE,
            no_tasks_label: NO_TASKS_ACTIVE,
            no_task_icon: ICON_ACTIVE,
        },
        TasksFilterType::CompletedTasks => FilteringUiInfo {
            current_filtering_label: LABEL_COMPLETED,
            no_tasks_label: NO_TASKS_COMPLETED,
            no_task_icon: ICON_COMPLETED,
        },
    }
}

pub struct TasksViewModel {
    service: SyncService,
    filter: watch::Sender<TasksFilterType>,
    is_loading: watch::Sender<bool>,
    user_message: watch::Sender<Option<&'static str>>,
    ui_state: watch::Receiver<TasksUiState>,
    driver: JoinHandle<()>,
}

impl TasksViewModel {
    /// Subscribe to the service's task list and start deriving state.
    ///
    /// Until the first list arrives the state reports `is_loading`.
    pub async fn new(service: SyncService) -> Self {
        let (filter, filter_rx) = watch::channel(TasksFilterType::default());
        let (is_loading, loading_rx) = watch::channel(false);
        let (user_message, message_rx) = watch::channel(None);
        let (state_tx, ui_state) = watch::channel(TasksUiState {
            is_loading: true,
            ..Default::default()
        });

        let tasks = service.get_tasks_stream().await;
        let driver = tokio::spawn(drive(tasks, filter_rx, loading_rx, message_rx, state_tx));

        Self {
            service,
            filter,
            is_loading,
            user_message,
            ui_state,
            driver,
        }
    }

    /// Current state.
    pub fn state(&self) -> TasksUiState {
        self.ui_state.borrow().clone()
    }

    /// Receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<TasksUiState> {
        self.ui_state.clone()
    }

    pub fn set_filtering(&self, filter: TasksFilterType) {
        self.filter.send_replace(filter);
    }

    pub fn filtering(&self) -> TasksFilterType {
        *self.filter.borrow()
    }

    pub async fn complete_task(&self, task: &Task, completed: bool) -> Result<()> {
        if completed {
            self.service.complete_task(&task.id).await?;
            self.show_snackbar_message(MSG_TASK_COMPLETED);
        } else {
            self.service.activate_task(&task.id).await?;
            self.show_snackbar_message(MSG_TASK_ACTIVATED);
        }
        Ok(())
    }

    pub async fn clear_completed_tasks(&self) -> Result<()> {
        self.service.clear_completed_tasks().await?;
        self.show_snackbar_message(MSG_COMPLETED_TASKS_CLEARED);
        self.refresh().await;
        Ok(())
    }

    pub fn show_edit_result_message(&self, result: EditResult) {
        let message = match result {
            EditResult::Saved => MSG_TASK_SAVED,
            EditResult::Added => MSG_TASK_ADDED,
            EditResult::Deleted => MSG_TASK_DELETED,
        };
        self.show_snackbar_message(message);
    }

    /// The message was displayed; clear the slot.
    pub fn snackbar_message_shown(&self) {
        self.user_message.send_replace(None);
    }

    /// Reload from the backend, flagging the state as loading meanwhile.
    pub async fn refresh(&self) {
        self.is_loading.send_replace(true);
        if let Err(e) = self.service.refresh().await {
            warn!("Refresh from the task list failed: {e:#}");
            self.show_snackbar_message(ERROR_REFRESHING_TASKS);
        }
        self.is_loading.send_replace(false);
    }

    fn show_snackbar_message(&self, message: &'static str) {
        self.user_message.send_replace(Some(message));
    }
}

impl Drop for TasksViewModel {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

async fn drive(
    mut tasks: TaskListStream,
    mut filter: watch::Receiver<TasksFilterType>,
    mut is_loading: watch::Receiver<bool>,
    mut user_message: watch::Receiver<Option<&'static str>>,
    state: watch::Sender<TasksUiState>,
) {
    let mut latest: Option<Vec<Task>> = None;

    loop {
        if let Some(all) = &latest {
            let filter_type = *filter.borrow_and_update();
            state.send_replace(TasksUiState {
                items: filter_tasks(all, filter_type),
                is_loading: *is_loading.borrow_and_update(),
                filtering_ui_info: filtering_ui_info(filter_type),
                user_message: *user_message.borrow_and_update(),
            });
        }

        tokio::select! {
            emission = tasks.next() => match emission {
                Some(Ok(list)) => latest = Some(list),
                Some(Err(e)) => {
                    error!("❌ Task stream failed: {e:#}");
                    state.send_replace(TasksUiState {
                        user_message: Some(ERROR_LOADING_TASKS),
                        ..Default::default()
                    });
                    return;
                }
                None => return,
            },
            changed = filter.changed() => {
                if changed.is_err() {
                    return;
                }
            }
            changed = is_loading.changed() => {
                if changed.is_err() {
                    return;
                }
            }
            changed = user_message.changed() => {
                if changed.is_err() {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::entities::task;
    use crate::storage::observer::TaskObservers;

    fn sample() -> Vec<Task> {
        let mut done = Task::new("2", "Done", "finished");
        done.is_completed = true;
        vec![Task::new("1", "Open", "pending"), done]
    }

    #[test]
    fn test_filter_all_keeps_everything() {
        assert_eq!(filter_tasks(&sample(), TasksFilterType::AllTasks).len(), 2);
    }

    #[test]
    fn test_filter_active_and_completed_partition() {
        let active = filter_tasks(&sample(), TasksFilterType::ActiveTasks);
        let completed = filter_tasks(&sample(), TasksFilterType::CompletedTasks);

        assert_eq!(active.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), ["1"]);
        assert_eq!(completed.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), ["2"]);
    }

    #[test]
    fn test_filtering_ui_info_per_filter() {
        assert_eq!(filtering_ui_info(TasksFilterType::AllTasks).current_filtering_label, LABEL_ALL);
        assert_eq!(filtering_ui_info(TasksFilterType::ActiveTasks).no_tasks_label, NO_TASKS_ACTIVE);
        assert_eq!(filtering_ui_info(TasksFilterType::CompletedTasks).no_task_icon, ICON_COMPLETED);
        assert_eq!(FilteringUiInfo::default(), filtering_ui_info(TasksFilterType::AllTasks));
    }

    #[tokio::test]
    async fn test_stream_error_ends_in_error_state() {
        let observers = TaskObservers::default();
        let tasks = TaskListStream::new(observers.subscribe_all(Ok(vec![task::Model {
            id: "1".to_string(),
            title: "Open".to_string(),
            description: "pending".to_string(),
            is_completed: false,
        }])));
        let (_filter, filter_rx) = watch::channel(TasksFilterType::ActiveTasks);
        let (_is_loading, loading_rx) = watch::channel(true);
        let (_message, message_rx) = watch::channel(None);
        let (state_tx, state_rx) = watch::channel(TasksUiState::default());

        observers.publish(Err(Arc::new(anyhow::anyhow!("read failed"))));
        drive(tasks, filter_rx, loading_rx, message_rx, state_tx).await;

        let state = state_rx.borrow().clone();
        assert!(state.items.is_empty());
        assert!(!state.is_loading);
        assert_eq!(state.user_message, Some(ERROR_LOADING_TASKS));
        assert_eq!(state.filtering_ui_info, FilteringUiInfo::default());
    }
}
