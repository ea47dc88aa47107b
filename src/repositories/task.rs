//! Task repository for database operations.

use anyhow::Result;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use crate::entities::task;

/// Repository for task-related database operations.
pub struct TaskRepository;

impl TaskRepository {
    /// Get all tasks ordered by id.
    pub async fn get_all<C>(conn: &C) -> Result<Vec<task::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(task::Entity::find().order_by_asc(task::Column::Id).all(conn).await?)
    }

    /// Get a single task by id.
    pub async fn get_by_id<C>(conn: &C, id: &str) -> Result<Option<task::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(task::Entity::find_by_id(id.to_string()).one(conn).await?)
    }

    /// Number of stored tasks.
    pub async fn count<C>(conn: &C) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        Ok(task::Entity::find().count(conn).await?)
    }

    /// Insert a task, overwriting every column when the id already exists.
    pub async fn upsert<C>(conn: &C, task: task::Model) -> Result<()>
    where
        C: ConnectionTrait,
    {
        task::Entity::insert(Self::active_model(task))
            .on_conflict(Self::on_id_conflict())
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Upsert many tasks in a single statement.
    pub async fn upsert_all<C>(conn: &C, tasks: Vec<task::Model>) -> Result<()>
    where
        C: ConnectionTrait,
    {
        if tasks.is_empty() {
            return Ok(());
        }
        task::Entity::insert_many(tasks.into_iter().map(Self::active_model))
            .on_conflict(Self::on_id_conflict())
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Set the completion flag; returns the number of rows touched.
    pub async fn update_completed<C>(conn: &C, id: &str, completed: bool) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let result = task::Entity::update_many()
            .col_expr(task::Column::IsCompleted, Expr::value(completed))
            .filter(task::Column::Id.eq(id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Delete a task by id; returns the number of rows removed.
    pub async fn delete_by_id<C>(conn: &C, id: &str) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let result = task::Entity::delete_by_id(id.to_string()).exec(conn).await?;
        Ok(result.rows_affected)
    }

    /// Delete every task.
    pub async fn delete_all<C>(conn: &C) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let result = task::Entity::delete_many().exec(conn).await?;
        Ok(result.rows_affected)
    }

    /// Delete completed tasks; returns the number of rows removed.
    pub async fn delete_completed<C>(conn: &C) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let result = task::Entity::delete_many()
            .filter(task::Column::IsCompleted.eq(true))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    fn active_model(task: task::Model) -> task::ActiveModel {
        task::ActiveModel {
            id: ActiveValue::Set(task.id),
            title: ActiveValue::Set(task.title),
            description: ActiveValue::Set(task.description),
            is_completed: ActiveValue::Set(task.is_completed),
        }
    }

    fn on_id_conflict() -> OnConflict {
        OnConflict::column(task::Column::Id)
            .update_columns([
                task::Column::Title,
                task::Column::Description,
                task::Column::IsCompleted,
            ])
            .to_owned()
    }
}
