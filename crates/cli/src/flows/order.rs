//! The order menu: compose pizzas, place, modify and clear the open order.

use pizzeria_auth::User;
use pizzeria_catalog::{Ingredient, Product};
use pizzeria_inventory::{ToppingSelection, validate_topping};
use pizzeria_orders::{LineItemView, order_total};
use pizzeria_store::{LineItemRequest, Orders, Store, StoreResult};

use crate::flows::surface;
use crate::prompt::Prompter;

/// The order menu loop. Placing the order returns to the main menu.
pub async fn order_flow(
    store: &Store,
    prompter: &mut impl Prompter,
    user: &User,
) -> StoreResult<()> {
    loop {
        let options: Vec<String> = [
            "Order a pizza",
            "Place order",
            "Modify order",
            "Clear order items",
            "Go back",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        match prompter.choose_one("What would you like to do?", &options) {
            0 => order_pizza_flow(store, prompter, user).await?,
            1 => {
                if place_order_flow(store, prompter, user).await? {
                    return Ok(());
                }
            }
            2 => modify_order_flow(store, prompter, user).await?,
            3 => clear_order_flow(store, prompter, user).await?,
            _ => return Ok(()),
        }
    }
}

/// Pick a product, quantity, toppings and comment, then hand the request to
/// the composition engine. Domain failures (stock, caps) are spoken and the
/// user stays in the loop.
async fn order_pizza_flow(
    store: &Store,
    prompter: &mut impl Prompter,
    user: &User,
) -> StoreResult<()> {
    let catalog = store.catalog();
    let composer = store.composer();
    loop {
        let products = catalog.list_products().await?;
        let mut options: Vec<String> = products.iter().map(Product::menu_line).collect();
        options.push("Cancel".to_string());
        let choice = prompter.choose_one("Which pizza would you like?", &options);
        if choice == products.len() {
            return Ok(());
        }
        let product = &products[choice];

        let quantity = read_quantity(prompter);
        let toppings = choose_toppings(store, prompter, product, quantity).await?;
        let comment = read_comment(prompter);

        let request = LineItemRequest {
            user_id: user.id,
            product_id: product.id,
            quantity,
            toppings,
            comment,
        };
        if surface(composer.add_to_order(&request).await, prompter)?.is_some() {
            prompter.say("Your order has been updated!");
        }
        if !prompter.read_bool("Do you want to add another pizza?", false) {
            return Ok(());
        }
    }
}

fn read_quantity(prompter: &mut impl Prompter) -> i64 {
    loop {
        let text = prompter.read_text("How many would you like?", "1");
        match text.parse::<i64>() {
            Ok(amount) if amount > 0 => return amount,
            _ => prompter.say("Invalid amount!"),
        }
    }
}

/// The extra-topping loop. Amounts are pre-checked against the cap and the
/// stock level read here; the composition engine re-checks against fresh
/// stock inside its transaction.
async fn choose_toppings(
    store: &Store,
    prompter: &mut impl Prompter,
    product: &Product,
    quantity: i64,
) -> StoreResult<Vec<ToppingSelection>> {
    let mut selections: Vec<ToppingSelection> = Vec::new();
    if !prompter.read_bool("Do you want extra toppings?", false) {
        return Ok(selections);
    }
    let toppings = store.catalog().list_topping_ingredients().await?;
    loop {
        let mut options: Vec<String> = toppings.iter().map(|t| t.name.clone()).collect();
        options.push("Done".to_string());
        let choice = prompter.choose_one("Choose a topping:", &options);
        if choice == toppings.len() {
            return Ok(selections);
        }
        let topping = &toppings[choice];
        let amount = read_topping_amount(prompter, topping, quantity);

        // Re-picking a topping replaces the earlier amount.
        match selections.iter_mut().find(|s| s.ingredient_id == topping.id) {
            Some(existing) => existing.amount = amount,
            None => selections.push(ToppingSelection {
                ingredient_id: topping.id,
                ingredient_name: topping.name.clone(),
                amount,
            }),
        }
        prompter.say(&format!(
            "Added {amount}x {} to your {}",
            topping.name, product.name
        ));

        if !prompter.read_bool("Do you want another topping?", false) {
            return Ok(selections);
        }
    }
}

fn read_topping_amount(prompter: &mut impl Prompter, topping: &Ingredient, quantity: i64) -> i64 {
    loop {
        let text = prompter.read_text(&format!("How much extra {}?", topping.name), "1");
        let Ok(amount) = text.parse::<i64>() else {
            prompter.say("Invalid amount!");
            continue;
        };
        match validate_topping(topping, amount, quantity) {
            Ok(()) => return amount,
            Err(err) => prompter.say(&err.to_string()),
        }
    }
}

fn read_comment(prompter: &mut impl Prompter) -> Option<String> {
    if !prompter.read_bool("Do you want to add a comment?", false) {
        return None;
    }
    let text = prompter.read_text("Enter your comment:", "");
    if text.is_empty() { None } else { Some(text) }
}

/// Show the open order with its total and place it on confirmation.
/// Returns whether the order was placed.
async fn place_order_flow(
    store: &Store,
    prompter: &mut impl Prompter,
    user: &User,
) -> StoreResult<bool> {
    let orders = store.orders();
    let items = orders.list_open_line_items(user.id).await?;
    if items.is_empty() {
        prompter.say("You haven't added anything to your order yet!");
        return Ok(false);
    }

    prompter.say("Your order:");
    say_items(prompter, &items);
    prompter.say(&format!("Total: {} kr", order_total(&items)));

    if !prompter.read_bool("Do you want to place this order?", true) {
        return Ok(false);
    }
    // The EXISTS guard in the store makes this a no-op if the order emptied
    // out since the listing above.
    if orders.place_open_order(user.id).await? {
        prompter.say("Order placed successfully!");
        Ok(true)
    } else {
        prompter.say("You haven't added anything to your order yet!");
        Ok(false)
    }
}

fn say_items(prompter: &mut impl Prompter, items: &[LineItemView]) {
    for item in items {
        prompter.say(&item.receipt_line());
        for topping in &item.toppings {
            prompter.say(&format!("   + {}x {}", topping.amount, topping.ingredient_name));
        }
        if let Some(comment) = &item.comment {
            prompter.say(&format!("   >>: {comment}"));
        }
    }
}

async fn modify_order_flow(
    store: &Store,
    prompter: &mut impl Prompter,
    user: &User,
) -> StoreResult<()> {
    let orders = store.orders();
    loop {
        let items = orders.list_open_line_items(user.id).await?;
        if items.is_empty() {
            prompter.say("You haven't added anything to your order yet!");
            return Ok(());
        }
        let mut options: Vec<String> = items.iter().map(item_label).collect();
        options.push("Go back".to_string());
        let choice = prompter.choose_one("Which item do you want to modify?", &options);
        if choice == items.len() {
            return Ok(());
        }
        modify_item_flow(&orders, prompter, &items[choice]).await?;
    }
}

fn item_label(item: &LineItemView) -> String {
    let mut label = item.receipt_line();
    for topping in &item.toppings {
        label.push_str(&format!("\n   + {}x {}", topping.amount, topping.ingredient_name));
    }
    if let Some(comment) = &item.comment {
        label.push_str(&format!("\n   >>: {comment}"));
    }
    label
}

/// Modifications never touch the ingredient ledger: removed or shrunk items
/// do not return stock, and grown amounts are not re-checked against it.
async fn modify_item_flow(
    orders: &Orders,
    prompter: &mut impl Prompter,
    item: &LineItemView,
) -> StoreResult<()> {
    let options: Vec<String> = ["Remove item", "Change amount", "Change comment", "Go back"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    match prompter.choose_one(&item.receipt_line(), &options) {
        0 => {
            if prompter.read_bool("Are you sure you want to remove this item?", false)
                && surface(orders.remove_line_item(item.order_item_id).await, prompter)?.is_some()
            {
                prompter.say("Item removed from order!");
            }
        }
        1 => {
            let amount = loop {
                let text = prompter.read_text("Enter the new amount:", &item.amount.to_string());
                match text.parse::<i64>() {
                    Ok(amount) if amount > 0 => break amount,
                    _ => prompter.say("Invalid amount!"),
                }
            };
            if surface(
                orders.update_line_item_amount(item.order_item_id, amount).await,
                prompter,
            )?
            .is_some()
            {
                prompter.say("Amount updated!");
            }
        }
        2 => {
            let text = prompter.read_text("Enter the new comment: (leave empty to clear)", "");
            let comment = if text.is_empty() { None } else { Some(text.as_str()) };
            if surface(
                orders.update_line_item_comment(item.order_item_id, comment).await,
                prompter,
            )?
            .is_some()
            {
                prompter.say("Comment updated!");
            }
        }
        _ => {}
    }
    Ok(())
}

async fn clear_order_flow(
    store: &Store,
    prompter: &mut impl Prompter,
    user: &User,
) -> StoreResult<()> {
    let orders = store.orders();
    let items = orders.list_open_line_items(user.id).await?;
    if items.is_empty() {
        prompter.say("You haven't added anything to your order yet!");
        return Ok(());
    }
    let question = format!(
        "Are you sure you want to clear all {} items from your order?",
        items.len()
    );
    if prompter.read_bool(&question, false) {
        let removed = orders.clear_open_order(user.id).await?;
        prompter.say(&format!("Removed {removed} items from your order."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::script::{Reply, ScriptedPrompter};
    use pizzeria_auth::hash_password;
    use pizzeria_core::IngredientId;
    use pizzeria_store::NewUser;

    // Seeded catalog: products in id order start with Margherita (1 dough,
    // 1 tomato sauce, 2 cheese); topping ingredients in id order start with
    // Cheese at 150 in stock.
    const DOUGH: IngredientId = IngredientId::new(1);
    const CHEESE: IngredientId = IngredientId::new(3);

    async fn store_with_user() -> (Store, User) {
        let store = Store::open_in_memory().await.expect("open in-memory store");
        let user = store
            .users()
            .create(&NewUser {
                email: "eva@example.com".into(),
                password_hash: hash_password("password123"),
                first_name: "Eva".into(),
                last_name: "Moss".into(),
                is_admin: false,
            })
            .await
            .unwrap();
        (store, user)
    }

    async fn stock_of(store: &Store, id: IngredientId) -> i64 {
        store.catalog().get_ingredient(id).await.unwrap().in_stock
    }

    #[tokio::test]
    async fn ordering_a_pizza_reserves_stock_and_adds_a_line_item() {
        let (store, user) = store_with_user().await;
        let mut prompter = ScriptedPrompter::new([
            Reply::Choice(0),          // order a pizza
            Reply::Choice(0),          // Margherita
            Reply::Text("2".into()),   // quantity
            Reply::Bool(false),        // no toppings
            Reply::Bool(false),        // no comment
            Reply::Bool(false),        // no more pizzas
            Reply::Choice(4),          // go back
        ]);
        order_flow(&store, &mut prompter, &user).await.unwrap();
        assert!(prompter.said("Your order has been updated!"));

        let items = store.orders().list_open_line_items(user.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].amount, 2);
        assert_eq!(items[0].product_name, "Margherita");
        assert_eq!(stock_of(&store, DOUGH).await, 98);
        assert_eq!(stock_of(&store, CHEESE).await, 146);
    }

    #[tokio::test]
    async fn extra_topping_is_added_on_top_of_the_recipe() {
        let (store, user) = store_with_user().await;
        let mut prompter = ScriptedPrompter::new([
            Reply::Choice(0),
            Reply::Choice(0),          // Margherita
            Reply::Text("1".into()),
            Reply::Bool(true),         // extra toppings
            Reply::Choice(0),          // Cheese
            Reply::Text("3".into()),
            Reply::Bool(false),        // no more toppings
            Reply::Bool(false),        // no comment
            Reply::Bool(false),
            Reply::Choice(4),
        ]);
        order_flow(&store, &mut prompter, &user).await.unwrap();
        assert!(prompter.said("Added 3x Cheese to your Margherita"));

        // 2 cheese from the recipe plus 3 extra: 150 - 5.
        assert_eq!(stock_of(&store, CHEESE).await, 145);
        let items = store.orders().list_open_line_items(user.id).await.unwrap();
        assert_eq!(items[0].toppings.len(), 1);
        assert_eq!(items[0].toppings[0].amount, 3);
    }

    #[tokio::test]
    async fn invalid_quantity_reprompts() {
        let (store, user) = store_with_user().await;
        let mut prompter = ScriptedPrompter::new([
            Reply::Choice(0),
            Reply::Choice(0),
            Reply::Text("zero".into()),
            Reply::Text("-1".into()),
            Reply::Text("1".into()),
            Reply::Bool(false),
            Reply::Bool(false),
            Reply::Bool(false),
            Reply::Choice(4),
        ]);
        order_flow(&store, &mut prompter, &user).await.unwrap();
        assert!(prompter.said("Invalid amount!"));
        let items = store.orders().list_open_line_items(user.id).await.unwrap();
        assert_eq!(items[0].amount, 1);
    }

    #[tokio::test]
    async fn placing_an_empty_order_is_refused() {
        let (store, user) = store_with_user().await;
        let mut prompter = ScriptedPrompter::new([
            Reply::Choice(1), // place order
            Reply::Choice(4), // go back
        ]);
        order_flow(&store, &mut prompter, &user).await.unwrap();
        assert!(prompter.said("You haven't added anything to your order yet!"));
        assert!(store.orders().list_placed_orders(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn placing_an_order_shows_the_total_and_leaves_the_menu() {
        let (store, user) = store_with_user().await;
        let mut prompter = ScriptedPrompter::new([
            Reply::Choice(0),
            Reply::Choice(0),          // Margherita, 80 kr
            Reply::Text("2".into()),
            Reply::Bool(false),
            Reply::Bool(true),         // comment
            Reply::Text("Extra crispy".into()),
            Reply::Bool(false),
            Reply::Choice(1),          // place order
            Reply::Bool(true),         // confirm
        ]);
        order_flow(&store, &mut prompter, &user).await.unwrap();
        assert!(prompter.said("2x Margherita - 80 kr"));
        assert!(prompter.said("   >>: Extra crispy"));
        assert!(prompter.said("Total: 160 kr"));
        assert!(prompter.said("Order placed successfully!"));

        let placed = store.orders().list_placed_orders(user.id).await.unwrap();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].item_count, 1);
    }

    #[tokio::test]
    async fn modifying_an_item_changes_its_amount_without_touching_stock() {
        let (store, user) = store_with_user().await;
        let mut prompter = ScriptedPrompter::new([
            Reply::Choice(0),
            Reply::Choice(0),
            Reply::Text("1".into()),
            Reply::Bool(false),
            Reply::Bool(false),
            Reply::Bool(false),
            Reply::Choice(2),          // modify order
            Reply::Choice(0),          // the Margherita item
            Reply::Choice(1),          // change amount
            Reply::Text("3".into()),
            Reply::Choice(1),          // go back (one item, so index 1)
            Reply::Choice(4),
        ]);
        order_flow(&store, &mut prompter, &user).await.unwrap();
        assert!(prompter.said("Amount updated!"));

        let items = store.orders().list_open_line_items(user.id).await.unwrap();
        assert_eq!(items[0].amount, 3);
        // Reserved for one unit only; amount changes never touch the ledger.
        assert_eq!(stock_of(&store, DOUGH).await, 99);
    }

    #[tokio::test]
    async fn removing_an_item_does_not_restock() {
        let (store, user) = store_with_user().await;
        let mut prompter = ScriptedPrompter::new([
            Reply::Choice(0),
            Reply::Choice(0),
            Reply::Text("1".into()),
            Reply::Bool(false),
            Reply::Bool(false),
            Reply::Bool(false),
            Reply::Choice(2),
            Reply::Choice(0),
            Reply::Choice(0),          // remove item
            Reply::Bool(true),         // confirm
            Reply::Choice(4),
        ]);
        order_flow(&store, &mut prompter, &user).await.unwrap();
        assert!(prompter.said("Item removed from order!"));

        assert!(store.orders().list_open_line_items(user.id).await.unwrap().is_empty());
        assert_eq!(stock_of(&store, DOUGH).await, 99);
    }

    #[tokio::test]
    async fn clearing_the_order_removes_all_items() {
        let (store, user) = store_with_user().await;
        let mut prompter = ScriptedPrompter::new([
            Reply::Choice(0),
            Reply::Choice(0),
            Reply::Text("1".into()),
            Reply::Bool(false),
            Reply::Bool(false),
            Reply::Bool(true),         // another pizza
            Reply::Choice(1),          // Vesuvio
            Reply::Text("1".into()),
            Reply::Bool(false),
            Reply::Bool(false),
            Reply::Bool(false),
            Reply::Choice(3),          // clear order items
            Reply::Bool(true),
            Reply::Choice(4),
        ]);
        order_flow(&store, &mut prompter, &user).await.unwrap();
        assert!(prompter.said("Removed 2 items from your order."));
        assert!(store.orders().list_open_line_items(user.id).await.unwrap().is_empty());
    }
}
