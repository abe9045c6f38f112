//! In-process todo store
//!
//! Mirrors the table semantics: ids start at 1 and are never reused,
//! listings come back in id order.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::todos::{DbError, TodoStore};
use crate::models::{NewTodo, Priority, Todo, TodoId};

#[derive(Default)]
struct Table {
    rows: BTreeMap<TodoId, Todo>,
    last_id: TodoId,
}

/// Todo store that lives in memory and is lost on restart
#[derive(Default)]
pub struct MemoryTodoStore {
    table: RwLock<Table>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn insert(&self, todo: NewTodo) -> Result<Todo, DbError> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let todo = Todo::from_new(table.last_id, todo);
        table.rows.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, DbError> {
        let mut table = self.table.write().await;
        let row = table.rows.get_mut(&todo.id).ok_or_else(|| DbError::NotFound {
            resource: "todo",
            id: todo.id.to_string(),
        })?;
        *row = todo.clone();
        Ok(todo.clone())
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, DbError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Todo>, DbError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_priority(&self, priority: Priority) -> Result<Vec<Todo>, DbError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|t| t.priority == priority)
            .cloned()
            .collect())
    }

    async fn delete_by_id(&self, id: TodoId) -> Result<bool, DbError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}
