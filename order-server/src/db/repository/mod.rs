//! Repository Module
//!
//! Free async functions over the SQLite pool, one module per table
//! family. Batch lookups use dynamically built `IN (...)` clauses.

pub mod coupon;
pub mod customer;
pub mod order;
pub mod product;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Write conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// SQLITE_BUSY (5) and SQLITE_LOCKED (6), including the extended
/// variants such as SQLITE_BUSY_SNAPSHOT (517). Raised when a
/// concurrent writer holds the lock past the busy timeout, or when a
/// deferred transaction cannot upgrade its read snapshot.
fn is_lock_contention(code: &str) -> bool {
    code.parse::<i64>()
        .map(|c| matches!(c & 0xff, 5 | 6))
        .unwrap_or(false)
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(err.to_string())
            }
            sqlx::Error::Database(db)
                if db.code().is_some_and(|c| is_lock_contention(&c)) =>
            {
                RepoError::Conflict(err.to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for shared::error::AppError {
    fn from(err: RepoError) -> Self {
        use shared::error::{AppError, ErrorCode};
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Conflict(msg) => {
                AppError::with_message(ErrorCode::PersistenceConflict, msg)
            }
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Build `?, ?, ...` for a SQL `IN` clause with `n` entries
pub(crate) fn sql_placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
