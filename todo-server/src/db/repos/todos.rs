//! Todo store trait and the PostgreSQL implementation
//!
//! Every operation is a single statement:
//! - insert: INSERT ... RETURNING (id from BIGSERIAL)
//! - update: UPDATE ... RETURNING, NotFound if the row is gone
//! - delete: DELETE, reports whether a row was removed

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::models::{NewTodo, Priority, Todo, TodoId};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("unreadable {column} value in database: '{value}'")]
    Decode { column: &'static str, value: String },
}

/// Persistence operations for todo records.
///
/// Lookups report absence as `None`/`false`; only `update` treats a
/// missing row as an error since it has nothing to return.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Save a new todo, returning it with the storage-assigned id.
    async fn insert(&self, todo: NewTodo) -> Result<Todo, DbError>;

    /// Save an existing todo, overwriting every column but the id.
    async fn update(&self, todo: &Todo) -> Result<Todo, DbError>;

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, DbError>;

    /// All todos in id order.
    async fn find_all(&self) -> Result<Vec<Todo>, DbError>;

    /// Todos whose priority equals `priority`, in id order.
    async fn find_by_priority(&self, priority: Priority) -> Result<Vec<Todo>, DbError>;

    /// Delete by id. Returns `false` if nothing was deleted.
    async fn delete_by_id(&self, id: TodoId) -> Result<bool, DbError>;

    /// Round-trip to the backing storage.
    async fn ping(&self) -> Result<(), DbError>;
}

/// Todo store backed by the `todos` table
#[derive(Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const TODO_COLUMNS: &str = "id, title, description, priority, created_at, updated_at, is_completed";

fn todo_from_row(row: &PgRow) -> Result<Todo, DbError> {
    let priority: String = row.try_get("priority")?;
    let priority = priority
        .parse::<Priority>()
        .map_err(|_| DbError::Decode {
            column: "priority",
            value: priority,
        })?;

    Ok(Todo {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        priority,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        is_completed: row.try_get("is_completed")?,
    })
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn insert(&self, todo: NewTodo) -> Result<Todo, DbError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO todos (title, description, priority, created_at, updated_at, is_completed)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(todo.title.as_str())
        .bind(todo.description.as_str())
        .bind(todo.priority.as_str())
        .bind(todo.created_at)
        .bind(todo.updated_at)
        .bind(todo.is_completed)
        .fetch_one(&self.pool)
        .await?;

        todo_from_row(&row)
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, DbError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE todos
            SET title = $2,
                description = $3,
                priority = $4,
                created_at = $5,
                updated_at = $6,
                is_completed = $7
            WHERE id = $1
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(todo.id)
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.priority.as_str())
        .bind(todo.created_at)
        .bind(todo.updated_at)
        .bind(todo.is_completed)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "todo",
            id: todo.id.to_string(),
        })?;

        todo_from_row(&row)
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, DbError> {
        let row = sqlx::query(&format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(todo_from_row).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Todo>, DbError> {
        let rows = sqlx::query(&format!("SELECT {TODO_COLUMNS} FROM todos ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(todo_from_row).collect()
    }

    async fn find_by_priority(&self, priority: Priority) -> Result<Vec<Todo>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE priority = $1 ORDER BY id"
        ))
        .bind(priority.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(todo_from_row).collect()
    }

    async fn delete_by_id(&self, id: TodoId) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
