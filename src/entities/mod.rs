//! SeaORM entity models for database tables.

pub mod task;

pub use task::Entity as Task;
