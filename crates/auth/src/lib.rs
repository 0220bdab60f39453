//! `pizzeria-auth` — user records and credential handling.
//!
//! Authentication is a collaborator of the ordering core, not part of it:
//! this crate provides the typed user record, salted credential hashing and
//! the input validation rules the login/registration flows enforce.

pub mod credentials;
pub mod user;
pub mod validate;

pub use credentials::{hash_password, verify_password};
pub use user::User;
pub use validate::{MIN_PASSWORD_LEN, validate_email, validate_password};
