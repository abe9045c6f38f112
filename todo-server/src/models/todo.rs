//! Todo records and the payloads that create or change them

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{timestamp, Priority, ValidationError};

/// Storage-assigned identifier of a todo.
pub type TodoId = i64;

/// Minimum description length in characters
const MIN_DESCRIPTION_LEN: usize = 3;

/// Maximum description length in characters
const MAX_DESCRIPTION_LEN: usize = 255;

/// A persisted todo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub is_completed: bool,
}

impl Todo {
    /// Attach a storage-assigned id to a new todo.
    pub fn from_new(id: TodoId, new: NewTodo) -> Self {
        Self {
            id,
            title: new.title.into_string(),
            description: new.description.into_string(),
            priority: new.priority,
            created_at: new.created_at,
            updated_at: new.updated_at,
            is_completed: new.is_completed,
        }
    }

    /// Overwrite the mutable fields. Id, priority and creation time are kept.
    pub fn apply(&mut self, changes: TodoChanges) {
        self.title = changes.title.into_string();
        self.description = changes.description.into_string();
        self.updated_at = changes.updated_at;
        self.is_completed = changes.is_completed;
    }
}

/// Validated todo title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoTitle(String);

impl TodoTitle {
    /// Create a new title. Only the empty string is rejected; whitespace
    /// counts as content.
    ///
    /// # Example
    /// ```
    /// use todo_server::models::TodoTitle;
    ///
    /// assert!(TodoTitle::new("Buy milk").is_ok());
    /// assert!(TodoTitle::new("").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Validated todo description (3 to 255 characters)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDescription(String);

impl TodoDescription {
    /// Create a new description, counting characters rather than bytes.
    ///
    /// # Example
    /// ```
    /// use todo_server::models::TodoDescription;
    ///
    /// assert!(TodoDescription::new("Two litres").is_ok());
    /// assert!(TodoDescription::new("no").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let len = s.chars().count();
        if !(MIN_DESCRIPTION_LEN..=MAX_DESCRIPTION_LEN).contains(&len) {
            return Err(ValidationError::Length {
                field: "description",
                min: MIN_DESCRIPTION_LEN,
                max: MAX_DESCRIPTION_LEN,
                actual: len,
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// A todo that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: TodoTitle,
    pub description: TodoDescription,
    pub priority: Priority,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub is_completed: bool,
}

/// The four fields an update may overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: TodoTitle,
    pub description: TodoDescription,
    pub updated_at: Option<NaiveDateTime>,
    pub is_completed: bool,
}

/// Todo request body as sent by clients.
///
/// Every field is optional here so that a missing field is reported as a
/// validation error rather than a deserialization failure. An `id` in the
/// body is ignored. Timestamps are local date-times (`2024-05-01T10:00:00`);
/// a null or absent `isCompleted` means `false`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub is_completed: Option<bool>,
}

impl TodoPayload {
    /// Validate the payload for creation.
    pub fn into_new_todo(self) -> Result<NewTodo, ValidationError> {
        let title = Self::title(self.title.as_deref())?;
        let description = Self::description(self.description.as_deref())?;
        let priority = self
            .priority
            .as_deref()
            .ok_or(ValidationError::Missing { field: "priority" })?
            .parse::<Priority>()?;

        Ok(NewTodo {
            title,
            description,
            priority,
            created_at: self.created_at,
            updated_at: self.updated_at,
            is_completed: self.is_completed.unwrap_or(false),
        })
    }

    /// Validate the payload for an update. Priority and createdAt are ignored.
    pub fn into_changes(self) -> Result<TodoChanges, ValidationError> {
        Ok(TodoChanges {
            title: Self::title(self.title.as_deref())?,
            description: Self::description(self.description.as_deref())?,
            updated_at: self.updated_at,
            is_completed: self.is_completed.unwrap_or(false),
        })
    }

    fn title(value: Option<&str>) -> Result<TodoTitle, ValidationError> {
        TodoTitle::new(value.ok_or(ValidationError::Missing { field: "title" })?)
    }

    fn description(value: Option<&str>) -> Result<TodoDescription, ValidationError> {
        TodoDescription::new(value.ok_or(ValidationError::Missing { field: "description" })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> TodoPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn rejects_only_empty_title() {
        let err = TodoTitle::new("").unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "title" });
        assert_eq!(TodoTitle::new(" ").unwrap().as_str(), " ");
    }

    #[test]
    fn description_bounds_are_inclusive() {
        assert!(TodoDescription::new("abc").is_ok());
        assert!(TodoDescription::new(&"a".repeat(255)).is_ok());

        let err = TodoDescription::new("ab").unwrap_err();
        assert!(matches!(err, ValidationError::Length { actual: 2, .. }));

        let err = TodoDescription::new(&"a".repeat(256)).unwrap_err();
        assert!(matches!(err, ValidationError::Length { actual: 256, .. }));
    }

    #[test]
    fn description_counts_characters_not_bytes() {
        // three characters, nine bytes
        assert!(TodoDescription::new("日本語").is_ok());
        assert!(TodoDescription::new(&"é".repeat(255)).is_ok());
    }

    #[test]
    fn payload_into_new_todo() {
        let new = payload(
            r#"{"title":"Buy milk","description":"Two litres","priority":"LOW",
                "createdAt":"2024-05-01T10:00:00","isCompleted":true}"#,
        )
        .into_new_todo()
        .unwrap();

        assert_eq!(new.title.as_str(), "Buy milk");
        assert_eq!(new.priority, Priority::Low);
        assert!(new.created_at.is_some());
        assert!(new.updated_at.is_none());
        assert!(new.is_completed);
    }

    #[test]
    fn payload_completion_defaults_to_false() {
        let new = payload(r#"{"title":"t","description":"desc","priority":"HIGH"}"#)
            .into_new_todo()
            .unwrap();
        assert!(!new.is_completed);
    }

    #[test]
    fn payload_null_completion_is_false() {
        let new = payload(r#"{"title":"t","description":"desc","priority":"HIGH","isCompleted":null}"#)
            .into_new_todo()
            .unwrap();
        assert!(!new.is_completed);
    }

    #[test]
    fn payload_accepts_local_and_offset_timestamps() {
        let new = payload(
            r#"{"title":"t","description":"desc","priority":"HIGH",
                "createdAt":"2024-05-01T10:00:00","updatedAt":"2024-05-01T12:00:00+02:00"}"#,
        )
        .into_new_todo()
        .unwrap();
        assert_eq!(new.created_at, new.updated_at);
    }

    #[test]
    fn payload_rejects_malformed_timestamp() {
        let result = serde_json::from_str::<TodoPayload>(
            r#"{"title":"t","description":"desc","priority":"HIGH","createdAt":"soon"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn payload_ignores_id() {
        let new = payload(r#"{"id":99,"title":"t","description":"desc","priority":"HIGH"}"#)
            .into_new_todo();
        assert!(new.is_ok());
    }

    #[test]
    fn create_requires_title_and_priority() {
        let err = payload(r#"{"description":"desc","priority":"LOW"}"#)
            .into_new_todo()
            .unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "title" });

        let err = payload(r#"{"title":"t","description":"desc"}"#)
            .into_new_todo()
            .unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "priority" });
    }

    #[test]
    fn create_rejects_unknown_priority() {
        let err = payload(r#"{"title":"t","description":"desc","priority":"SOMEDAY"}"#)
            .into_new_todo()
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { .. }));
    }

    #[test]
    fn changes_ignore_priority() {
        let changes = payload(r#"{"title":"t","description":"desc","priority":"bogus"}"#)
            .into_changes()
            .unwrap();
        assert_eq!(changes.title.as_str(), "t");
    }

    #[test]
    fn apply_keeps_id_priority_and_created_at() {
        let created = "2024-01-01T00:00:00".parse::<NaiveDateTime>().unwrap();
        let updated = "2024-02-01T00:00:00".parse::<NaiveDateTime>().unwrap();
        let mut todo = Todo {
            id: 7,
            title: "old".into(),
            description: "old description".into(),
            priority: Priority::Vital,
            created_at: Some(created),
            updated_at: None,
            is_completed: false,
        };

        todo.apply(TodoChanges {
            title: TodoTitle::new("new").unwrap(),
            description: TodoDescription::new("new description").unwrap(),
            updated_at: Some(updated),
            is_completed: true,
        });

        assert_eq!(todo.id, 7);
        assert_eq!(todo.priority, Priority::Vital);
        assert_eq!(todo.created_at, Some(created));
        assert_eq!(todo.title, "new");
        assert_eq!(todo.description, "new description");
        assert_eq!(todo.updated_at, Some(updated));
        assert!(todo.is_completed);
    }

    #[test]
    fn todo_serializes_camel_case() {
        let todo = Todo {
            id: 1,
            title: "Buy milk".into(),
            description: "Two litres".into(),
            priority: Priority::Low,
            created_at: None,
            updated_at: None,
            is_completed: false,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["priority"], "LOW");
        assert_eq!(json["isCompleted"], false);
        assert!(json["createdAt"].is_null());
    }
}
