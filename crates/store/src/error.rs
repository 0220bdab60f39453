//! Storage error model.
//!
//! Domain failures (insufficient stock, invalid input, not found) pass
//! through as [`DomainError`] so interactive callers can recover; everything
//! else is an infrastructure failure that aborts the current operation after
//! a full rollback.

use thiserror::Error;

use pizzeria_core::DomainError;

/// Result type used across the storage layer.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A deterministic domain failure surfaced by a storage operation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Underlying SQLite/sqlx failure. Any in-flight transaction has been
    /// rolled back by the time this reaches the caller.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The bundled seed data could not be parsed.
    #[error("seed data error: {0}")]
    Seed(#[from] serde_json::Error),
}

impl StoreError {
    /// The recoverable domain failure inside this error, if any.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            StoreError::Domain(e) => Some(e),
            _ => None,
        }
    }
}
