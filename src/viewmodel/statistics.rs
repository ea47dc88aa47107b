//! Active/completed statistics derived from the live task list.

use anyhow::Result;
use log::error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::sync::{SyncService, TaskListStream};
use crate::task::Task;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TaskStats {
    pub active_percent: f32,
    pub completed_percent: f32,
}

/// Share of active and completed tasks, in percent. Both are 0 for an empty list.
pub fn compute_stats(tasks: &[Task]) -> TaskStats {
    if tasks.is_empty() {
        return TaskStats::default();
    }
    let total = tasks.len() as f32;
    let active = tasks.iter().filter(|task| task.is_active()).count() as f32;

    TaskStats {
        active_percent: 100.0 * active / total,
        completed_percent: 100.0 * (total - active) / total,
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatisticsUiState {
    pub is_empty: bool,
    pub is_loading: bool,
    pub active_tasks_percent: f32,
    pub completed_tasks_percent: f32,
    pub user_message: Option<&'static str>,
}

pub struct StatisticsViewModel {
    service: SyncService,
    ui_state: watch::Receiver<StatisticsUiState>,
    driver: JoinHandle<()>,
}

impl StatisticsViewModel {
    pub async fn new(service: SyncService) -> Self {
        let (state_tx, ui_state) = watch::channel(StatisticsUiState {
            is_loading: true,
            ..Default::default()
        });
        let tasks = service.get_tasks_stream().await;
        let driver = tokio::spawn(drive(tasks, state_tx));

        Self {
            service,
            ui_state,
            driver,
        }
    }

    pub fn state(&self) -> StatisticsUiState {
        self.ui_state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StatisticsUiState> {
        self.ui_state.clone()
    }

    /// Reload from the backend; the stream picks up the new rows.
    pub async fn refresh(&self) -> Result<()> {
        self.service.refresh().await
    }
}

impl Drop for StatisticsViewModel {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

async fn drive(mut tasks: TaskListStream, state: watch::Sender<StatisticsUiState>) {
    while let Some(emission) = tasks.next().await {
        match emission {
            Ok(list) => {
                let stats = compute_stats(&list);
                state.send_replace(StatisticsUiState {
                    is_empty: list.is_empty(),
                    is_loading: false,
                    active_tasks_percent: stats.active_percent,
                    completed_tasks_percent: stats.completed_percent,
                    user_message: None,
                });
            }
            Err(e) => {
                error!("❌ Task stream failed: {e:#}");
                state.send_replace(StatisticsUiState {
                    user_message: Some(crate::constants::ERROR_LOADING_TASKS),
                    ..Default::default()
                });
                return;
            }
        }
    }
}
