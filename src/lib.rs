//! tasklayer - data layer for a to-do list application
//!
//! This library keeps tasks in a local SQLite table, mirrors that table to a
//! remote backend after every change, and derives UI-ready read models from
//! live queries on the table.
//!
//! # Modules
//!
//! The library is organized into several key modules:
//!
//! * [`task`] - Domain task model
//! * [`storage`] - Local database with live subscriptions
//! * [`backend`] - Remote backend abstraction and in-memory implementation
//! * [`sync`] - Repository that writes locally and pushes remotely
//! * [`viewmodel`] - Task list and statistics read models
//! * [`config`] - Application configuration management

/// Backend abstraction layer for the remote task mirror
pub mod backend;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// SeaORM entity models for database tables
pub mod entities;

/// Logging utilities for debugging and error tracking
pub mod logger;

/// Conversions between domain, persisted and wire task models
pub mod mapping;

/// Repository layer for database operations
pub mod repositories;

/// IO/CPU dispatchers and the background scope
pub mod runtime;

/// Local storage layer for tasks
pub mod storage;

/// Synchronization between local storage and the backend
pub mod sync;

/// Domain task model
pub mod task;

/// Read models for the task list and statistics screens
pub mod viewmodel;

pub use task::Task;
