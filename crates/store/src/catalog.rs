//! Read-only access to products, ingredients and recipes.

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqliteRow};

use pizzeria_catalog::{Ingredient, Product, RecipeEntry};
use pizzeria_core::{DomainError, IngredientId, ProductId};

use crate::error::StoreResult;

/// Catalog store. Read-only; the only error beyond infrastructure failures
/// is `NotFound` for unknown identifiers.
#[derive(Debug, Clone)]
pub struct Catalog {
    pool: SqlitePool,
}

impl Catalog {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All products, in stable id order.
    pub async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(
            "SELECT id, name, price, description, updated_at FROM product ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(product_from_row).collect()
    }

    pub async fn get_product(&self, id: ProductId) -> StoreResult<Product> {
        let row = sqlx::query(
            "SELECT id, name, price, description, updated_at FROM product WHERE id = ?",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => product_from_row(&row),
            None => Err(DomainError::not_found().into()),
        }
    }

    /// Ingredients eligible as toppings, in stable id order.
    pub async fn list_topping_ingredients(&self) -> StoreResult<Vec<Ingredient>> {
        let rows = sqlx::query(
            "SELECT id, name, in_stock, is_topping, updated_at \
             FROM ingredient WHERE is_topping = 1 ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(ingredient_from_row).collect()
    }

    pub async fn get_ingredient(&self, id: IngredientId) -> StoreResult<Ingredient> {
        let row = sqlx::query(
            "SELECT id, name, in_stock, is_topping, updated_at FROM ingredient WHERE id = ?",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => ingredient_from_row(&row),
            None => Err(DomainError::not_found().into()),
        }
    }

    /// The full bill of materials for one unit of a product, with the stock
    /// level of each ingredient at read time. `NotFound` for unknown products.
    pub async fn get_recipe(&self, product_id: ProductId) -> StoreResult<Vec<RecipeEntry>> {
        let exists = sqlx::query("SELECT 1 FROM product WHERE id = ?")
            .bind(product_id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(DomainError::not_found().into());
        }

        let rows = sqlx::query(
            "SELECT i.id, i.name, i.in_stock, pi.amount \
             FROM product_ingredient pi \
             JOIN ingredient i ON i.id = pi.ingredient_id \
             WHERE pi.product_id = ? \
             ORDER BY i.id",
        )
        .bind(product_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(RecipeEntry {
                    ingredient_id: IngredientId::new(row.try_get("id")?),
                    ingredient_name: row.try_get("name")?,
                    in_stock: row.try_get("in_stock")?,
                    amount: row.try_get("amount")?,
                })
            })
            .collect()
    }
}

fn product_from_row(row: &SqliteRow) -> StoreResult<Product> {
    Ok(Product {
        id: ProductId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        description: row.try_get("description")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

fn ingredient_from_row(row: &SqliteRow) -> StoreResult<Ingredient> {
    Ok(Ingredient {
        id: IngredientId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        in_stock: row.try_get("in_stock")?,
        is_topping: row.try_get("is_topping")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
