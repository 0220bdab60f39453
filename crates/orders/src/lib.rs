//! `pizzeria-orders` — typed records for orders and their line items.

pub mod order;

pub use order::{
    LineItemView, Order, OrderItem, OrderItemTopping, OrderStatus, PlacedOrderSummary, order_total,
};
