//! Todo store implementations
//!
//! Both stores implement [`TodoStore`] and are interchangeable behind
//! `Arc<dyn TodoStore>`:
//! - `PgTodoStore` persists to the `todos` table
//! - `MemoryTodoStore` keeps records in process (tests, `--in-memory`)

pub mod memory;
pub mod todos;

pub use memory::MemoryTodoStore;
pub use todos::{DbError, PgTodoStore, TodoStore};
