//! Order composition engine.
//!
//! One invocation per "add pizza to order" action: validate the request,
//! compute the derived ingredient consumption, then reserve stock and
//! persist the line item as a single transaction. Either the ledger
//! decrement and the order-item/topping rows all commit, or none do.

use sqlx::sqlite::SqlitePool;
use tracing::instrument;

use pizzeria_core::{OrderItemId, ProductId, UserId};
use pizzeria_inventory::{
    ToppingSelection, total_requirements, validate_quantity, validate_topping,
};

use crate::catalog::Catalog;
use crate::error::StoreResult;
use crate::inventory;
use crate::orders::{insert_line_item_tx, open_order_tx};

/// A proposed line item: product, quantity, extra toppings, free-text
/// comment.
#[derive(Debug, Clone)]
pub struct LineItemRequest {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub toppings: Vec<ToppingSelection>,
    pub comment: Option<String>,
}

/// Order composition engine.
#[derive(Debug, Clone)]
pub struct Composer {
    pool: SqlitePool,
}

impl Composer {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a line item to the user's open order.
    ///
    /// 1. Validate the quantity (`InvalidInput` on non-positive).
    /// 2. Validate each topping: cap first (`ToppingLimitExceeded`), then the
    ///    quantity-scaled stock pre-check (`InsufficientStock`). A topping
    ///    that alone exceeds stock fails here, with a topping-specific error,
    ///    before the combined check below could catch it.
    /// 3. Fetch the recipe (`NotFound` for unknown products).
    /// 4. Compute total requirements: `base * quantity` per recipe entry plus
    ///    matching topping amounts, additively. Overflowing quantities fail
    ///    here as `InvalidInput`.
    /// 5. Reserve against the ledger and
    /// 6. persist the open order, line item and topping rows — steps 5 and 6
    ///    run in one transaction; any failure rolls back both.
    #[instrument(
        skip(self, request),
        fields(
            user_id = %request.user_id,
            product_id = %request.product_id,
            quantity = request.quantity,
            toppings = request.toppings.len(),
        ),
        err
    )]
    pub async fn add_to_order(&self, request: &LineItemRequest) -> StoreResult<OrderItemId> {
        validate_quantity(request.quantity)?;

        let catalog = Catalog::new(self.pool.clone());
        for topping in &request.toppings {
            let ingredient = catalog.get_ingredient(topping.ingredient_id).await?;
            validate_topping(&ingredient, topping.amount, request.quantity)?;
        }

        let recipe = catalog.get_recipe(request.product_id).await?;
        let requirements = total_requirements(&recipe, request.quantity, &request.toppings)?;

        let mut tx = self.pool.begin().await?;
        inventory::check_and_reserve(&mut tx, &requirements).await?;
        let order = open_order_tx(&mut tx, request.user_id).await?;
        let order_item_id = insert_line_item_tx(
            &mut tx,
            order.id,
            request.product_id,
            request.quantity,
            request.comment.as_deref(),
            &request.toppings,
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(%order_item_id, order_id = %order.id, "line item added");
        Ok(order_item_id)
    }
}
