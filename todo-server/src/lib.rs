//! todo-server: REST service for todo records
//!
//! Layers, bottom up:
//! - `db` - `TodoStore` trait, PostgreSQL and in-memory stores
//! - `service` - existence checks and update semantics
//! - `http` - axum routes under `/api/v1`

pub mod db;
pub mod http;
pub mod models;
pub mod service;

pub use http::{build_router, run_server, AppState, ServerConfig};
pub use service::{ServiceError, TimestampPolicy, TodoService};
