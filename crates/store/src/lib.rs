//! `pizzeria-store` — SQLite persistence for the ordering system.
//!
//! The [`Store`] handle owns the connection pool with an explicit open/close
//! lifecycle (no process-global connection). Component accessors expose the
//! read side ([`Catalog`]), the order aggregate ([`Orders`]), the auth
//! collaborator ([`Users`]) and the transactional order composition engine
//! ([`Composer`]). The inventory ledger only operates inside a transaction
//! owned by the composer, which is what makes reserve-and-persist atomic.

pub mod catalog;
pub mod composer;
pub mod error;
pub mod inventory;
pub mod orders;
pub mod store;
pub mod users;


pub use catalog::Catalog;
pub use composer::{Composer, LineItemRequest};
pub use error::{StoreError, StoreResult};
pub use orders::Orders;
pub use store::Store;
pub use users::{NewUser, Users};
