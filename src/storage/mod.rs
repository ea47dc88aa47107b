//! Local storage module for task persistence.
//!
//! This module provides the SQLite-backed task table (through SeaORM) along
//! with the live queries the read models subscribe to:
//! - One-shot reads and writes
//! - Whole-table and single-row subscriptions

pub mod db;
pub mod observer;
pub mod tasks;

pub use db::LocalStorage;
pub use observer::{Emission, Subscription};
