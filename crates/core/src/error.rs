//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere.
///
/// Every variant here is recoverable from the interactive session's point of
/// view: the caller re-prompts or returns to the previous menu, never
/// terminates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed user entry (e.g. non-numeric or non-positive quantity).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A topping request exceeded the per-pizza cap. Business rule, checked
    /// before any stock lookup.
    #[error("you can't have more than 10 of each topping (asked for {amount}x {ingredient})")]
    ToppingLimitExceeded { ingredient: String, amount: i64 },

    /// Not enough of an ingredient in stock to satisfy a reservation.
    #[error("not enough {ingredient} in stock (need {required}, {available} left)")]
    InsufficientStock {
        ingredient: String,
        required: i64,
        available: i64,
    },

    /// A referenced product/order/line-item does not exist. Treated as an
    /// invariant breach in the interactive flows (menus are built from the
    /// same queries), so callers abort the current operation, not the session.
    #[error("not found")]
    NotFound,

    /// A uniqueness or state conflict (e.g. registering an email twice).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn topping_limit(ingredient: impl Into<String>, amount: i64) -> Self {
        Self::ToppingLimitExceeded {
            ingredient: ingredient.into(),
            amount,
        }
    }

    pub fn insufficient_stock(
        ingredient: impl Into<String>,
        required: i64,
        available: i64,
    ) -> Self {
        Self::InsufficientStock {
            ingredient: ingredient.into(),
            required,
            available,
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
