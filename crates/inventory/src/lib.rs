//! `pizzeria-inventory` — pure order-composition arithmetic.
//!
//! Everything here is deterministic and IO-free: given a recipe, a quantity
//! and a set of requested toppings, compute what the reservation against the
//! ledger must look like. The actual check-and-decrement happens in the
//! store crate, inside a transaction, against fresh stock values.

pub mod requirements;

pub use requirements::{
    StockRequirement, ToppingSelection, TOPPING_LIMIT, total_requirements, validate_quantity,
    validate_topping,
};
