//! Domain models with validation at construction
//!
//! Request payloads are converted into these types at the HTTP boundary.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod priority;
pub mod todo;
pub mod timestamp;

pub use validation::ValidationError;
pub use priority::Priority;
pub use todo::{NewTodo, Todo, TodoChanges, TodoDescription, TodoId, TodoPayload, TodoTitle};
