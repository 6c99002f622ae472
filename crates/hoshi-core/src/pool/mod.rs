//! Persistent bot store (SQLite via sqlx).
//!
//! Holds user notes and linked game-stats memberships. Duplicate-key inserts
//! surface as [`PoolError::AlreadyExists`] and absent rows as
//! [`PoolError::NotFound`] so command handlers can answer users precisely.

pub mod db;
mod members;
mod notes;
pub mod types;

pub use db::Pool;
pub use types::*;

/// Store error taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// Unique-constraint violation on insert.
    #[error("{0}")]
    AlreadyExists(String),
    /// No row matched the lookup.
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("state dir: {0}")]
    Io(#[from] std::io::Error),
    #[error("xdg: {0}")]
    Xdg(#[from] xdg::BaseDirectoriesError),
}

/// Map a sqlx insert error, turning unique violations into `AlreadyExists`.
pub(crate) fn map_insert_err(err: sqlx::Error, exists_msg: impl Into<String>) -> PoolError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            PoolError::AlreadyExists(exists_msg.into())
        }
        _ => PoolError::Sqlx(err),
    }
}
