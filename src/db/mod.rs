//! Analysis history store: SQLite on a dedicated worker thread.

mod connection;
mod helpers;
mod migrations;
pub mod models;
mod repositories;

pub use connection::Database;
pub use models::StoredAnalysis;
