//! Todo service - existence checks and update semantics over a store
//!
//! The store is handed in explicitly; the service holds nothing else.

use std::sync::Arc;

use chrono::Utc;

use crate::db::{DbError, TodoStore};
use crate::models::{NewTodo, Priority, Todo, TodoChanges, TodoId};

/// Where `createdAt`/`updatedAt` come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampPolicy {
    /// Store whatever the client sent, including nothing.
    #[default]
    ClientSupplied,
    /// Stamp `createdAt`/`updatedAt` on create and `updatedAt` on update
    /// with the server clock (UTC), ignoring client values.
    ServerAssigned,
}

/// Service error type
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Todo with ID {id} not found.")]
    NotFound { id: TodoId },

    #[error(transparent)]
    Store(#[from] DbError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Todo operations exposed over HTTP
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    timestamps: TimestampPolicy,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>, timestamps: TimestampPolicy) -> Self {
        Self { store, timestamps }
    }

    pub fn timestamp_policy(&self) -> TimestampPolicy {
        self.timestamps
    }

    /// Persist a new todo and return its id.
    pub async fn create_todo(&self, mut todo: NewTodo) -> ServiceResult<TodoId> {
        if self.timestamps == TimestampPolicy::ServerAssigned {
            let now = Utc::now().naive_utc();
            todo.created_at = Some(now);
            todo.updated_at = Some(now);
        }

        let created = self.store.insert(todo).await?;
        tracing::info!(todo_id = created.id, priority = %created.priority, "todo created");
        Ok(created.id)
    }

    pub async fn get_all_todos(&self) -> ServiceResult<Vec<Todo>> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get_todo_by_id(&self, id: TodoId) -> ServiceResult<Todo> {
        self.existing(id).await
    }

    /// Todos with exactly this priority. An empty list is not an error.
    pub async fn get_todos_by_priority(&self, priority: Priority) -> ServiceResult<Vec<Todo>> {
        let todos = self.store.find_by_priority(priority).await?;
        tracing::debug!(%priority, count = todos.len(), "todos by priority");
        Ok(todos)
    }

    /// Overwrite title, description, updatedAt and completion on an existing
    /// todo. Id, priority and createdAt never change.
    pub async fn update_todo(&self, id: TodoId, mut changes: TodoChanges) -> ServiceResult<Todo> {
        let mut todo = self.existing(id).await?;

        if self.timestamps == TimestampPolicy::ServerAssigned {
            changes.updated_at = Some(Utc::now().naive_utc());
        }
        todo.apply(changes);

        let updated = self.store.update(&todo).await.map_err(|e| match e {
            // deleted between lookup and save
            DbError::NotFound { .. } => ServiceError::NotFound { id },
            other => ServiceError::Store(other),
        })?;
        tracing::info!(todo_id = id, "todo updated");
        Ok(updated)
    }

    /// Delete an existing todo. A missing id is NotFound, not a silent success.
    pub async fn delete_todo(&self, id: TodoId) -> ServiceResult<()> {
        let todo = self.existing(id).await?;
        self.store.delete_by_id(todo.id).await?;
        tracing::info!(todo_id = id, "todo deleted");
        Ok(())
    }

    /// Check the store is reachable.
    pub async fn ping(&self) -> ServiceResult<()> {
        Ok(self.store.ping().await?)
    }

    async fn existing(&self, id: TodoId) -> ServiceResult<Todo> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryTodoStore;
    use crate::models::{TodoDescription, TodoTitle};
    use chrono::{NaiveDate, NaiveDateTime};

    fn service() -> TodoService {
        TodoService::new(Arc::new(MemoryTodoStore::new()), TimestampPolicy::ClientSupplied)
    }

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .unwrap()
    }

    fn new_todo(title: &str, priority: Priority) -> NewTodo {
        NewTodo {
            title: TodoTitle::new(title).unwrap(),
            description: TodoDescription::new("some description").unwrap(),
            priority,
            created_at: Some(at(1)),
            updated_at: Some(at(1)),
            is_completed: false,
        }
    }

    fn changes(title: &str, updated_at: Option<NaiveDateTime>, done: bool) -> TodoChanges {
        TodoChanges {
            title: TodoTitle::new(title).unwrap(),
            description: TodoDescription::new("changed description").unwrap(),
            updated_at,
            is_completed: done,
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_same_fields() {
        let service = service();
        let id = service.create_todo(new_todo("Buy milk", Priority::Low)).await.unwrap();

        let todo = service.get_todo_by_id(id).await.unwrap();
        assert_eq!(todo, Todo::from_new(id, new_todo("Buy milk", Priority::Low)));
    }

    #[tokio::test]
    async fn missing_id_is_not_found_regardless_of_contents() {
        let service = service();
        for n in 0..3 {
            let err = service.get_todo_by_id(100).await.unwrap_err();
            assert!(matches!(err, ServiceError::NotFound { id: 100 }));
            let err = service.delete_todo(100).await.unwrap_err();
            assert!(matches!(err, ServiceError::NotFound { id: 100 }));

            service
                .create_todo(new_todo(&format!("todo {n}"), Priority::Medium))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn not_found_message_names_the_id() {
        let err = service().get_todo_by_id(17).await.unwrap_err();
        assert_eq!(err.to_string(), "Todo with ID 17 not found.");
    }

    #[tokio::test]
    async fn priority_filter_returns_exact_subset() {
        let service = service();
        let milk = service.create_todo(new_todo("Buy milk", Priority::Low)).await.unwrap();
        let rent = service.create_todo(new_todo("Pay rent", Priority::Vital)).await.unwrap();
        assert_eq!((milk, rent), (1, 2));

        let low = service.get_todos_by_priority(Priority::Low).await.unwrap();
        assert_eq!(low.iter().map(|t| t.id).collect::<Vec<_>>(), [milk]);

        let high = service.get_todos_by_priority(Priority::High).await.unwrap();
        assert!(high.is_empty());

        service.delete_todo(rent).await.unwrap();
        assert!(matches!(
            service.get_todo_by_id(rent).await,
            Err(ServiceError::NotFound { id: 2 })
        ));
        assert!(service.get_todo_by_id(milk).await.is_ok());
    }

    #[tokio::test]
    async fn update_touches_only_four_fields() {
        let service = service();
        let id = service.create_todo(new_todo("draft", Priority::High)).await.unwrap();

        let updated = service
            .update_todo(id, changes("final", Some(at(5)), true))
            .await
            .unwrap();

        assert_eq!(updated.id, id);
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.created_at, Some(at(1)));
        assert_eq!(updated.title, "final");
        assert_eq!(updated.description, "changed description");
        assert_eq!(updated.updated_at, Some(at(5)));
        assert!(updated.is_completed);

        assert_eq!(service.get_todo_by_id(id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let err = service()
            .update_todo(9, changes("nothing", None, false))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { id: 9 }));
    }

    #[tokio::test]
    async fn client_supplied_timestamps_are_kept_even_when_stale() {
        let service = service();
        let id = service.create_todo(new_todo("t", Priority::Low)).await.unwrap();
        let updated = service
            .update_todo(id, changes("t", Some(at(1) - chrono::Duration::days(365)), false))
            .await
            .unwrap();
        assert!(updated.updated_at < updated.created_at);
    }

    #[tokio::test]
    async fn server_assigned_timestamps_ignore_client_values() {
        let service = TodoService::new(
            Arc::new(MemoryTodoStore::new()),
            TimestampPolicy::ServerAssigned,
        );
        let before = Utc::now().naive_utc();

        let id = service.create_todo(new_todo("t", Priority::Low)).await.unwrap();
        let created = service.get_todo_by_id(id).await.unwrap();
        assert!(created.created_at.unwrap() >= before);
        assert_eq!(created.created_at, created.updated_at);

        let updated = service
            .update_todo(id, changes("t", Some(at(2)), false))
            .await
            .unwrap();
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.unwrap() >= created.updated_at.unwrap());
    }

    #[tokio::test]
    async fn get_all_returns_every_record() {
        let service = service();
        assert!(service.get_all_todos().await.unwrap().is_empty());

        for p in Priority::ALL {
            service.create_todo(new_todo(p.as_str(), p)).await.unwrap();
        }
        assert_eq!(service.get_all_todos().await.unwrap().len(), 4);
    }
}
