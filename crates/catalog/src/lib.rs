//! `pizzeria-catalog` — typed records for the product catalog.
//!
//! Products, ingredients and recipes are read-only for the ordering core:
//! there is no product-management flow, so these are plain records hydrated
//! from the store, not aggregates with lifecycles.

pub mod ingredient;
pub mod product;

pub use ingredient::Ingredient;
pub use product::{Product, RecipeEntry};
