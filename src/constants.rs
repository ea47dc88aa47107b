//! Constants used throughout the application
//!
//! This module centralizes user-facing messages, defaults and limits.

// User Messages
pub const MSG_TASK_COMPLETED: &str = "Task marked as completed";
pub const MSG_TASK_ACTIVATED: &str = "Task marked as active";
pub const MSG_COMPLETED_TASKS_CLEARED: &str = "Completed tasks cleared";
pub const MSG_TASK_SAVED: &str = "Task saved";
pub const MSG_TASK_ADDED: &str = "New task added";
pub const MSG_TASK_DELETED: &str = "Task was deleted";

// Error Messages
pub const ERROR_LOADING_TASKS: &str = "Error while loading tasks";
pub const ERROR_REFRESHING_TASKS: &str = "Error while refreshing tasks";

// Filter Labels
pub const LABEL_ALL: &str = "All Tasks";
pub const LABEL_ACTIVE: &str = "Active Tasks";
pub const LABEL_COMPLETED: &str = "Completed Tasks";
pub const NO_TASKS_ALL: &str = "You have no tasks!";
pub const NO_TASKS_ACTIVE: &str = "You have no active tasks!";
pub const NO_TASKS_COMPLETED: &str = "You have no completed tasks!";

// Filter Icons
pub const ICON_ALL: &str = "logo_no_fill";
pub const ICON_ACTIVE: &str = "check_circle";
pub const ICON_COMPLETED: &str = "verified_user";

// UI Messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";

// Defaults
pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
/// Default artificial latency of the in-memory backend
pub const DEFAULT_REMOTE_LATENCY_MS: u64 = 2000;
/// Upper bound accepted for the backend latency
pub const MAX_REMOTE_LATENCY_MS: u64 = 60_000;
/// Default bound for a background push
pub const DEFAULT_PUSH_TIMEOUT_SECS: u64 = 30;
/// Upper bound accepted for the push timeout
pub const MAX_PUSH_TIMEOUT_SECS: u64 = 3600;
/// Lines kept in the in-memory log buffer
pub const MAX_LOG_ENTRIES: usize = 500;
