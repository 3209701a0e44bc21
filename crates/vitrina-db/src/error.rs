//! Database errors

use thiserror::Error;

/// Errors surfaced by the repository layer
#[derive(Error, Debug)]
pub enum DbError {
    /// Underlying SQLx failure (connection, query, decode)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Target row does not exist (e.g. payment for an unknown subscriber)
    #[error("record not found")]
    NotFound,
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;
