//! Inventory ledger: the only mutating path on ingredient stock.

use chrono::Utc;
use sqlx::{Row, Sqlite, Transaction};

use pizzeria_core::{DomainError, IngredientId};
use pizzeria_inventory::StockRequirement;

use crate::error::StoreResult;

/// Verify and decrement stock for every requirement, all-or-nothing.
///
/// Runs against the caller's transaction: if any ingredient falls short the
/// error propagates, the transaction is dropped without commit and no
/// decrement becomes visible. Stock is re-read here, inside the transaction,
/// so the decision is made on current values rather than whatever the
/// composition layer saw earlier.
pub async fn check_and_reserve(
    tx: &mut Transaction<'_, Sqlite>,
    requirements: &[StockRequirement],
) -> StoreResult<()> {
    let now = Utc::now();
    for requirement in requirements {
        let row = sqlx::query("SELECT in_stock FROM ingredient WHERE id = ?")
            .bind(requirement.ingredient_id.as_i64())
            .fetch_optional(&mut **tx)
            .await?;
        let Some(row) = row else {
            return Err(DomainError::not_found().into());
        };
        let available: i64 = row.try_get("in_stock")?;
        if available < requirement.required {
            return Err(DomainError::insufficient_stock(
                &requirement.ingredient_name,
                requirement.required,
                available,
            )
            .into());
        }

        sqlx::query("UPDATE ingredient SET in_stock = in_stock - ?, updated_at = ? WHERE id = ?")
            .bind(requirement.required)
            .bind(now)
            .bind(requirement.ingredient_id.as_i64())
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Current stock of one ingredient, outside any transaction.
pub async fn stock_of(
    pool: &sqlx::sqlite::SqlitePool,
    ingredient_id: IngredientId,
) -> StoreResult<i64> {
    let row = sqlx::query("SELECT in_stock FROM ingredient WHERE id = ?")
        .bind(ingredient_id.as_i64())
        .fetch_optional(pool)
        .await?;
    match row {
        Some(row) => Ok(row.try_get("in_stock")?),
        None => Err(DomainError::not_found().into()),
    }
}
