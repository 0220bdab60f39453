use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pizzeria_core::UserId;

/// An authenticated user account.
///
/// `password_hash` is the salted digest produced by
/// [`crate::credentials::hash_password`]; it never leaves the auth layer in
/// clear form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    /// Stored and displayed; no admin menu exists in the preserved scope.
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
