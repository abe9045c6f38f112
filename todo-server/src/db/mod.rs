//! Database layer - connection pool, schema and todo stores
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections) - no Arc<Mutex<Connection>>
//! - One statement per store call, no cross-call transactions
//! - Stores return `Option`/`bool` for missing rows; the service decides
//!   what a missing row means

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;
