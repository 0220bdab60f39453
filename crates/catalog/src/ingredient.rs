use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pizzeria_core::IngredientId;

/// Catalog record: an ingredient with its current stock level.
///
/// `in_stock` is mutated exclusively through the inventory ledger's
/// reservation path; everything else treats this record as read-only.
///
/// # Invariants
/// - `in_stock >= 0` after any committed operation (also enforced by a
///   CHECK constraint at the storage level).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub in_stock: i64,
    /// Eligible for ad-hoc addition to a line item on top of the recipe.
    pub is_topping: bool,
    pub updated_at: DateTime<Utc>,
}
