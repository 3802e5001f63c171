//! Database layer
//!
//! Provides the database abstraction for the Gazette content API:
//! - SQLite (default, for single-binary deployment)
//! - MySQL (for larger deployments)
//!
//! The driver is selected from configuration. Repositories dispatch on the
//! `DatabasePool` trait so the rest of the application never sees the
//! concrete backend.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
