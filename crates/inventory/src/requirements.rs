use serde::{Deserialize, Serialize};

use pizzeria_catalog::{Ingredient, RecipeEntry};
use pizzeria_core::{DomainError, DomainResult, IngredientId};

/// Per-pizza cap on a single topping. Business rule, not a stock check.
pub const TOPPING_LIMIT: i64 = 10;

/// An extra topping requested for one line item, independent of and additive
/// to whatever the recipe already consumes of the same ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToppingSelection {
    pub ingredient_id: IngredientId,
    pub ingredient_name: String,
    pub amount: i64,
}

/// One ingredient's share of a reservation: how much of it the line item
/// needs in total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRequirement {
    pub ingredient_id: IngredientId,
    pub ingredient_name: String,
    pub required: i64,
}

/// Validate a line-item quantity. Non-positive values are user-retry
/// conditions, not hard failures.
pub fn validate_quantity(quantity: i64) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::invalid_input(format!(
            "quantity must be a positive number, got {quantity}"
        )));
    }
    Ok(())
}

/// Validate one requested topping against the cap and against the stock
/// level read when the topping list was fetched.
///
/// Check order is fixed: the cap is rejected before any stock comparison, so
/// an over-cap request fails the same way regardless of availability. The
/// stock pre-check scales the topping by the line-item quantity, consistent
/// with recipe scaling. The combined recipe+topping reservation later re-reads
/// stock inside its transaction; under the single-session model this
/// point-in-time pre-check cannot go stale.
pub fn validate_topping(
    ingredient: &Ingredient,
    topping_amount: i64,
    quantity: i64,
) -> DomainResult<()> {
    if topping_amount <= 0 {
        return Err(DomainError::invalid_input(format!(
            "topping amount must be a positive number, got {topping_amount}"
        )));
    }
    if topping_amount > TOPPING_LIMIT {
        return Err(DomainError::topping_limit(&ingredient.name, topping_amount));
    }
    let required = topping_amount
        .checked_mul(quantity)
        .ok_or_else(|| overflow(&ingredient.name))?;
    if required > ingredient.in_stock {
        return Err(DomainError::insufficient_stock(
            &ingredient.name,
            required,
            ingredient.in_stock,
        ));
    }
    Ok(())
}

/// Compute the total ingredient consumption for one line item.
///
/// For each recipe entry: `base_amount * quantity`, plus the matching
/// topping's already-validated amount added on top. Toppings are additive,
/// not multiplicative with the recipe amount. A topping on an ingredient the
/// recipe does not use is pre-checked by [`validate_topping`] but contributes
/// no reservation.
///
/// An absurdly large quantity can overflow the scaling; that is
/// `InvalidInput`, never a wrap (a wrapped negative requirement would pass
/// the stock check and *grow* the ledger on reservation).
pub fn total_requirements(
    recipe: &[RecipeEntry],
    quantity: i64,
    toppings: &[ToppingSelection],
) -> DomainResult<Vec<StockRequirement>> {
    recipe
        .iter()
        .map(|entry| {
            let mut required = entry
                .amount
                .checked_mul(quantity)
                .ok_or_else(|| overflow(&entry.ingredient_name))?;
            for topping in toppings {
                if topping.ingredient_id == entry.ingredient_id {
                    required = required
                        .checked_add(topping.amount)
                        .ok_or_else(|| overflow(&entry.ingredient_name))?;
                }
            }
            Ok(StockRequirement {
                ingredient_id: entry.ingredient_id,
                ingredient_name: entry.ingredient_name.clone(),
                required,
            })
        })
        .collect()
}

fn overflow(ingredient: &str) -> DomainError {
    DomainError::invalid_input(format!("required amount of {ingredient} is too large"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn ingredient(id: i64, name: &str, in_stock: i64) -> Ingredient {
        Ingredient {
            id: IngredientId::new(id),
            name: name.to_string(),
            in_stock,
            is_topping: true,
            updated_at: Utc::now(),
        }
    }

    fn recipe_entry(id: i64, name: &str, in_stock: i64, amount: i64) -> RecipeEntry {
        RecipeEntry {
            ingredient_id: IngredientId::new(id),
            ingredient_name: name.to_string(),
            in_stock,
            amount,
        }
    }

    fn topping(id: i64, name: &str, amount: i64) -> ToppingSelection {
        ToppingSelection {
            ingredient_id: IngredientId::new(id),
            ingredient_name: name.to_string(),
            amount,
        }
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(validate_quantity(1).is_ok());
        assert!(matches!(
            validate_quantity(0),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_quantity(-3),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn topping_over_cap_rejected_regardless_of_stock() {
        // Plenty of stock, still rejected: the cap check runs first.
        let cheese = ingredient(1, "ExtraCheese", 1_000_000);
        let err = validate_topping(&cheese, 11, 1).unwrap_err();
        assert_eq!(
            err,
            DomainError::ToppingLimitExceeded {
                ingredient: "ExtraCheese".to_string(),
                amount: 11,
            }
        );
    }

    #[test]
    fn topping_at_cap_is_allowed() {
        let cheese = ingredient(1, "ExtraCheese", 100);
        assert!(validate_topping(&cheese, 10, 1).is_ok());
    }

    #[test]
    fn topping_stock_precheck_scales_with_quantity() {
        // 4 per pizza * 3 pizzas = 12 > 10 in stock.
        let olives = ingredient(2, "Olives", 10);
        let err = validate_topping(&olives, 4, 3).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientStock {
                ingredient: "Olives".to_string(),
                required: 12,
                available: 10,
            }
        );
        // 3 per pizza * 3 pizzas = 9 <= 10 passes.
        assert!(validate_topping(&olives, 3, 3).is_ok());
    }

    #[test]
    fn toppings_are_additive_not_multiplicative() {
        // quantity q = 5, base b = 10, topping t = 3 on the same ingredient:
        // consumption must be b*q + t = 53, not (b+t)*q = 65.
        let recipe = vec![recipe_entry(1, "Cheese", 100, 10)];
        let toppings = vec![topping(1, "Cheese", 3)];
        let reqs = total_requirements(&recipe, 5, &toppings).unwrap();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].required, 53);
    }

    #[test]
    fn topping_outside_recipe_contributes_no_requirement() {
        let recipe = vec![recipe_entry(1, "Dough", 50, 2)];
        let toppings = vec![topping(9, "Pineapple", 4)];
        let reqs = total_requirements(&recipe, 2, &toppings).unwrap();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].ingredient_id, IngredientId::new(1));
        assert_eq!(reqs[0].required, 4);
    }

    #[test]
    fn oversized_quantity_is_invalid_input_not_a_wrap() {
        // Parses fine as an i64 but overflows once scaled.
        let quantity = 1_000_000_000_000_000_000;

        let cheese = ingredient(1, "Cheese", i64::MAX);
        let err = validate_topping(&cheese, 10, quantity).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        let recipe = vec![recipe_entry(1, "Cheese", i64::MAX, 100)];
        let err = total_requirements(&recipe, quantity, &[]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn oversized_topping_addition_is_invalid_input() {
        let recipe = vec![recipe_entry(1, "Cheese", i64::MAX, 1)];
        let toppings = vec![topping(1, "Cheese", i64::MAX)];
        let err = total_requirements(&recipe, 1, &toppings).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    proptest! {
        #[test]
        fn additive_law_holds(base in 1i64..100, qty in 1i64..50, extra in 1i64..=10) {
            let recipe = vec![recipe_entry(1, "X", i64::MAX / 4, base)];
            let toppings = vec![topping(1, "X", extra)];
            let reqs = total_requirements(&recipe, qty, &toppings).unwrap();
            prop_assert_eq!(reqs[0].required, base * qty + extra);
        }

        #[test]
        fn requirements_are_positive(base in 1i64..100, qty in 1i64..50) {
            let recipe = vec![recipe_entry(1, "X", i64::MAX / 4, base)];
            let reqs = total_requirements(&recipe, qty, &[]).unwrap();
            prop_assert!(reqs.iter().all(|r| r.required > 0));
        }
    }
}
