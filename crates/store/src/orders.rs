//! Order aggregate repository: open-order lifecycle and line-item operations.
//!
//! Removal, amount changes and clearing deliberately do **not** return stock
//! to the ledger, and amount changes are not re-validated against stock:
//! ingredients are treated as committed once reserved.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use sqlx::{Row, Sqlite, Transaction};
use tracing::instrument;

use pizzeria_core::{DomainError, IngredientId, OrderId, OrderItemId, ProductId, UserId};
use pizzeria_inventory::{ToppingSelection, validate_quantity};
use pizzeria_orders::{LineItemView, Order, OrderItemTopping, OrderStatus, PlacedOrderSummary};

use crate::error::StoreResult;

/// Order aggregate store.
#[derive(Debug, Clone)]
pub struct Orders {
    pool: SqlitePool,
}

impl Orders {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The user's open order, created lazily if none exists. Idempotent
    /// while an open order exists.
    pub async fn get_or_create_open_order(&self, user_id: UserId) -> StoreResult<Order> {
        let mut tx = self.pool.begin().await?;
        let order = open_order_tx(&mut tx, user_id).await?;
        tx.commit().await?;
        Ok(order)
    }

    /// The user's open order, if any.
    pub async fn find_open_order(&self, user_id: UserId) -> StoreResult<Option<Order>> {
        let row = sqlx::query(
            "SELECT id, user_id, status, created_at, updated_at \
             FROM \"order\" WHERE user_id = ? AND status = 0",
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| order_from_row(&row)).transpose()
    }

    /// Line items of the user's open order, joined with product name/price
    /// and their toppings. Empty when there is no open order or no items yet.
    pub async fn list_open_line_items(&self, user_id: UserId) -> StoreResult<Vec<LineItemView>> {
        let rows = sqlx::query(
            "SELECT o.id AS order_id, oi.id AS order_item_id, oi.amount, oi.comment, \
                    p.name, p.price \
             FROM \"order\" o \
             JOIN order_item oi ON oi.order_id = o.id \
             JOIN product p ON p.id = oi.product_id \
             WHERE o.user_id = ? AND o.status = 0 \
             ORDER BY oi.id",
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let order_item_id = OrderItemId::new(row.try_get("order_item_id")?);
            items.push(LineItemView {
                order_id: OrderId::new(row.try_get("order_id")?),
                order_item_id,
                product_name: row.try_get("name")?,
                price: row.try_get("price")?,
                amount: row.try_get("amount")?,
                comment: row.try_get("comment")?,
                toppings: self.list_toppings(order_item_id).await?,
            });
        }
        Ok(items)
    }

    /// Toppings of one line item, joined with ingredient names.
    pub async fn list_toppings(
        &self,
        order_item_id: OrderItemId,
    ) -> StoreResult<Vec<OrderItemTopping>> {
        let rows = sqlx::query(
            "SELECT t.order_item_id, t.ingredient_id, i.name, t.amount \
             FROM order_item_topping t \
             JOIN ingredient i ON i.id = t.ingredient_id \
             WHERE t.order_item_id = ? \
             ORDER BY t.ingredient_id",
        )
        .bind(order_item_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(OrderItemTopping {
                    order_item_id: OrderItemId::new(row.try_get("order_item_id")?),
                    ingredient_id: IngredientId::new(row.try_get("ingredient_id")?),
                    ingredient_name: row.try_get("name")?,
                    amount: row.try_get("amount")?,
                })
            })
            .collect()
    }

    /// Delete a line item; its toppings cascade. No restock.
    #[instrument(skip(self), err)]
    pub async fn remove_line_item(&self, order_item_id: OrderItemId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM order_item WHERE id = ?")
            .bind(order_item_id.as_i64())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }

    /// Change a line item's quantity. Stock deltas are not re-validated.
    #[instrument(skip(self), err)]
    pub async fn update_line_item_amount(
        &self,
        order_item_id: OrderItemId,
        new_amount: i64,
    ) -> StoreResult<()> {
        validate_quantity(new_amount)?;
        let result = sqlx::query("UPDATE order_item SET amount = ?, updated_at = ? WHERE id = ?")
            .bind(new_amount)
            .bind(Utc::now())
            .bind(order_item_id.as_i64())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }

    /// Change or clear a line item's free-text comment.
    pub async fn update_line_item_comment(
        &self,
        order_item_id: OrderItemId,
        new_comment: Option<&str>,
    ) -> StoreResult<()> {
        let result = sqlx::query("UPDATE order_item SET comment = ?, updated_at = ? WHERE id = ?")
            .bind(new_comment)
            .bind(Utc::now())
            .bind(order_item_id.as_i64())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }

    /// Delete all line items (and cascaded toppings) of the user's open
    /// order. Returns the number of removed items. No restock.
    #[instrument(skip(self), err)]
    pub async fn clear_open_order(&self, user_id: UserId) -> StoreResult<u64> {
        let result = sqlx::query(
            "DELETE FROM order_item WHERE order_id = \
             (SELECT id FROM \"order\" WHERE user_id = ? AND status = 0)",
        )
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Flip the user's open order to `Placed` if and only if it has at least
    /// one line item. Returns `false` (no-op) otherwise.
    #[instrument(skip(self), err)]
    pub async fn place_open_order(&self, user_id: UserId) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE \"order\" SET status = 1, updated_at = ? \
             WHERE user_id = ? AND status = 0 \
               AND EXISTS (SELECT 1 FROM order_item oi WHERE oi.order_id = \"order\".id)",
        )
        .bind(Utc::now())
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The user's last ten placed orders, newest first.
    pub async fn list_placed_orders(
        &self,
        user_id: UserId,
    ) -> StoreResult<Vec<PlacedOrderSummary>> {
        let rows = sqlx::query(
            "SELECT o.id, COUNT(oi.id) AS item_count, o.created_at \
             FROM \"order\" o \
             JOIN order_item oi ON o.id = oi.order_id \
             WHERE o.user_id = ? AND o.status = 1 \
             GROUP BY o.id \
             ORDER BY o.created_at DESC \
             LIMIT 10",
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(PlacedOrderSummary {
                    order_id: OrderId::new(row.try_get("id")?),
                    item_count: row.try_get("item_count")?,
                    created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
                })
            })
            .collect()
    }

    /// Receipt lines for one order (any status). Toppings are not itemized
    /// on receipts.
    pub async fn receipt(&self, order_id: OrderId) -> StoreResult<Vec<LineItemView>> {
        let rows = sqlx::query(
            "SELECT oi.order_id, oi.id AS order_item_id, oi.amount, oi.comment, p.name, p.price \
             FROM order_item oi \
             JOIN product p ON p.id = oi.product_id \
             WHERE oi.order_id = ? \
             ORDER BY oi.id",
        )
        .bind(order_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(LineItemView {
                    order_id: OrderId::new(row.try_get("order_id")?),
                    order_item_id: OrderItemId::new(row.try_get("order_item_id")?),
                    product_name: row.try_get("name")?,
                    price: row.try_get("price")?,
                    amount: row.try_get("amount")?,
                    comment: row.try_get("comment")?,
                    toppings: Vec::new(),
                })
            })
            .collect()
    }
}

/// Fetch or lazily create the user's open order inside `tx`.
pub(crate) async fn open_order_tx(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: UserId,
) -> StoreResult<Order> {
    let existing = sqlx::query(
        "SELECT id, user_id, status, created_at, updated_at \
         FROM \"order\" WHERE user_id = ? AND status = 0",
    )
    .bind(user_id.as_i64())
    .fetch_optional(&mut **tx)
    .await?;

    if let Some(row) = existing {
        return order_from_row(&row);
    }

    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO \"order\" (user_id, status, created_at, updated_at) VALUES (?, 0, ?, ?)",
    )
    .bind(user_id.as_i64())
    .bind(now)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    Ok(Order {
        id: OrderId::new(result.last_insert_rowid()),
        user_id,
        status: OrderStatus::Open,
        created_at: now,
        updated_at: now,
    })
}

/// Insert a line item and its topping rows inside `tx`. Pure persistence
/// step; the composition engine has already reserved the inventory in the
/// same transaction.
pub(crate) async fn insert_line_item_tx(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: OrderId,
    product_id: ProductId,
    amount: i64,
    comment: Option<&str>,
    toppings: &[ToppingSelection],
) -> StoreResult<OrderItemId> {
    let now = Utc::now();
    sqlx::query("UPDATE \"order\" SET updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(order_id.as_i64())
        .execute(&mut **tx)
        .await?;

    let result = sqlx::query(
        "INSERT INTO order_item (order_id, product_id, amount, comment, updated_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(order_id.as_i64())
    .bind(product_id.as_i64())
    .bind(amount)
    .bind(comment)
    .bind(now)
    .execute(&mut **tx)
    .await?;
    let order_item_id = OrderItemId::new(result.last_insert_rowid());

    for topping in toppings {
        sqlx::query(
            "INSERT INTO order_item_topping (order_item_id, ingredient_id, amount) \
             VALUES (?, ?, ?)",
        )
        .bind(order_item_id.as_i64())
        .bind(topping.ingredient_id.as_i64())
        .bind(topping.amount)
        .execute(&mut **tx)
        .await?;
    }

    Ok(order_item_id)
}

fn order_from_row(row: &sqlx::sqlite::SqliteRow) -> StoreResult<Order> {
    let status_raw: i64 = row.try_get("status")?;
    let status = OrderStatus::from_i64(status_raw)
        .ok_or_else(|| DomainError::conflict(format!("unknown order status {status_raw}")))?;
    Ok(Order {
        id: OrderId::new(row.try_get("id")?),
        user_id: UserId::new(row.try_get("user_id")?),
        status,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
