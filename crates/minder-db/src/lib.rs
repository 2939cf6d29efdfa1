//! SQLite access layer for minder.
//!
//! Exposes the connection pool helpers, the row models, and the query
//! modules for the `users` and `tasks` tables.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
