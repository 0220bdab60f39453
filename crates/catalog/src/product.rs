use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pizzeria_core::{IngredientId, ProductId};

/// Catalog record: a product on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Price in whole kronor.
    pub price: i64,
    pub description: String,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Menu entry as shown in the product picker.
    pub fn menu_line(&self) -> String {
        format!("{} kr - {}\n - {}", self.price, self.name, self.description)
    }
}

/// One entry of a product's bill of materials: the base quantity of an
/// ingredient consumed per single unit of the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeEntry {
    pub ingredient_id: IngredientId,
    pub ingredient_name: String,
    /// Ingredient stock at the time the recipe was read.
    pub in_stock: i64,
    /// Base amount consumed per unit of the product.
    pub amount: i64,
}
