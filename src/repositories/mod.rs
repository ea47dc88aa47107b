//! Repository layer for database operations.
//!
//! Repositories encapsulate the SeaORM queries and keep entities as pure
//! data models. Every method is generic over [`sea_orm::ConnectionTrait`] so
//! it runs equally on a connection or inside a transaction.

pub mod task;

pub use task::TaskRepository;
