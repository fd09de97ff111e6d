//! SQLite persistence adapters (sqlx).

pub mod connection;
pub mod document_repo;
pub mod utils;

pub use connection::DatabaseConnection;
pub use document_repo::DocumentRepositoryImpl;
