//! Past orders: the last ten placed orders and their receipts.

use pizzeria_auth::User;
use pizzeria_orders::order_total;
use pizzeria_store::{Store, StoreResult};

use crate::prompt::Prompter;

pub async fn history_flow(
    store: &Store,
    prompter: &mut impl Prompter,
    user: &User,
) -> StoreResult<()> {
    let orders = store.orders();
    loop {
        let placed = orders.list_placed_orders(user.id).await?;
        if placed.is_empty() {
            prompter.say("You haven't placed any orders yet!");
            return Ok(());
        }

        let mut options: Vec<String> = placed
            .iter()
            .map(|order| {
                format!(
                    "{} ({} items)",
                    order.created_at.format("%Y-%m-%d %H:%M"),
                    order.item_count
                )
            })
            .collect();
        options.push("Go back".to_string());
        let choice = prompter.choose_one("Your past orders:", &options);
        if choice == placed.len() {
            return Ok(());
        }

        let order = &placed[choice];
        let items = orders.receipt(order.order_id).await?;
        prompter.say("--------");
        prompter.say(&format!("Order #{}", order.order_id));
        prompter.say(&format!(
            "Placed at {}",
            order.created_at.format("%Y-%m-%d %H:%M")
        ));
        for item in &items {
            prompter.say(&item.receipt_line());
        }
        prompter.say(&format!("Total: {} kr", order_total(&items)));
        prompter.say("--------");
        prompter.read_text("Press enter to go back.", "");
    }
}
