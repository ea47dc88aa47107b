//! Read models derived from the live task list.
//!
//! * [`tasks`] - filtered task list with loading flag and one-shot messages
//! * [`statistics`] - active/completed percentages

pub mod statistics;
pub mod tasks;

pub use statistics::{StatisticsUiState, StatisticsViewModel};
pub use tasks::{TasksFilterType, TasksUiState, TasksViewModel};
