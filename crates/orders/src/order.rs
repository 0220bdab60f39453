use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pizzeria_core::{IngredientId, OrderId, OrderItemId, ProductId, UserId};

/// Order status lifecycle. `Open` is the user's single in-progress order;
/// `Placed` is terminal — an order never transitions back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Placed,
}

impl OrderStatus {
    /// Storage encoding: 0 = Open, 1 = Placed.
    pub fn as_i64(self) -> i64 {
        match self {
            OrderStatus::Open => 0,
            OrderStatus::Placed => 1,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(OrderStatus::Open),
            1 => Some(OrderStatus::Placed),
            _ => None,
        }
    }
}

/// A user's order. At most one `Open` order exists per user at a time,
/// created lazily on the first line-item add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }
}

/// One product entry within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub amount: i64,
    pub comment: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Extra quantity of a topping ingredient added to a specific line item,
/// additive to the recipe amount. Deleted with its line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemTopping {
    pub order_item_id: OrderItemId,
    pub ingredient_id: IngredientId,
    pub ingredient_name: String,
    pub amount: i64,
}

/// A line item joined with its product and toppings, for display and total
/// computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemView {
    pub order_id: OrderId,
    pub order_item_id: OrderItemId,
    pub product_name: String,
    /// Unit price in whole kronor.
    pub price: i64,
    pub amount: i64,
    pub comment: Option<String>,
    pub toppings: Vec<OrderItemTopping>,
}

impl LineItemView {
    /// `amount * price`, in whole kronor, saturating rather than wrapping on
    /// absurd amounts. Toppings are free of charge.
    pub fn line_total(&self) -> i64 {
        self.amount.saturating_mul(self.price)
    }

    /// Receipt line with the unit price, e.g. `2x Margherita - 80 kr`.
    pub fn receipt_line(&self) -> String {
        format!("{}x {} - {} kr", self.amount, self.product_name, self.price)
    }
}

/// Order total as the sum of per-line `amount * price`, saturating.
pub fn order_total(items: &[LineItemView]) -> i64 {
    items
        .iter()
        .fold(0i64, |acc, item| acc.saturating_add(item.line_total()))
}

/// One row of the order-history listing: a placed order and its item count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrderSummary {
    pub order_id: OrderId,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, price: i64, amount: i64) -> LineItemView {
        LineItemView {
            order_id: OrderId::new(1),
            order_item_id: OrderItemId::new(1),
            product_name: name.to_string(),
            price,
            amount,
            comment: None,
            toppings: Vec::new(),
        }
    }

    #[test]
    fn status_roundtrips_through_storage_encoding() {
        assert_eq!(OrderStatus::from_i64(0), Some(OrderStatus::Open));
        assert_eq!(OrderStatus::from_i64(1), Some(OrderStatus::Placed));
        assert_eq!(OrderStatus::from_i64(2), None);
        assert_eq!(OrderStatus::Open.as_i64(), 0);
        assert_eq!(OrderStatus::Placed.as_i64(), 1);
    }

    #[test]
    fn order_total_sums_amount_times_price() {
        // 2 x 80 kr + 1 x 60 kr = 220 kr.
        let items = vec![line("Margherita", 80, 2), line("Calzone", 60, 1)];
        assert_eq!(order_total(&items), 220);
    }

    #[test]
    fn empty_order_totals_zero() {
        assert_eq!(order_total(&[]), 0);
    }

    #[test]
    fn receipt_line_shows_the_unit_price() {
        assert_eq!(line("Margherita", 80, 2).receipt_line(), "2x Margherita - 80 kr");
    }

    #[test]
    fn totals_saturate_instead_of_wrapping() {
        assert_eq!(line("Margherita", i64::MAX, 3).line_total(), i64::MAX);
        let items = vec![line("A", i64::MAX, 2), line("B", i64::MAX, 2)];
        assert_eq!(order_total(&items), i64::MAX);
    }
}
