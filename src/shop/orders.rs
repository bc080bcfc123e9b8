//! Order registry operations. Orders are write-once per id.

use super::errors::ShopError;
use super::models::{GetOrderStatusInput, Order};
use super::state::ShopState;

pub fn get_order(shop: &ShopState, input: &GetOrderStatusInput) -> Result<Order, ShopError> {
    if input.order_id.is_empty() {
        return Err(ShopError::validation("orderId is required"));
    }
    shop.orders
        .get(&input.order_id)
        .cloned()
        .ok_or_else(|| ShopError::not_found(format!("Unknown orderId: {}", input.order_id)))
}

/// Stores a new order. Ids are generated fresh for every checkout, so a
/// collision is an invariant breach and is refused rather than overwritten.
pub fn put_order(shop: &mut ShopState, order: Order) -> Result<(), ShopError> {
    if shop.orders.contains_key(&order.id) {
        return Err(ShopError::Internal(format!(
            "duplicate orderId: {}",
            order.id
        )));
    }
    shop.orders.insert(order.id.clone(), order);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shop::models::{Money, OrderStatus, OrderTotals, CURRENCY};
    use chrono::Utc;

    fn order(id: &str) -> Order {
        Order {
            id: id.to_string(),
            status: OrderStatus::Confirmed,
            created_at: Utc::now(),
            currency: CURRENCY.to_string(),
            payment_intent_id: "pi_1".to_string(),
            items: Vec::new(),
            totals: OrderTotals {
                subtotal: Money::gbp(100),
                tax: Money::gbp(0),
                shipping: Money::gbp(0),
                total: Money::gbp(100),
            },
        }
    }

    #[test]
    fn stored_order_is_returned_unchanged() {
        let mut shop = ShopState::default();
        let stored = order("ord_1");
        put_order(&mut shop, stored.clone()).unwrap();

        let fetched = get_order(
            &shop,
            &GetOrderStatusInput {
                order_id: "ord_1".to_string(),
            },
        )
        .unwrap();
        assert_eq!(fetched, stored);
    }

    #[test]
    fn missing_order_is_a_not_found_error() {
        let shop = ShopState::default();
        let err = get_order(
            &shop,
            &GetOrderStatusInput {
                order_id: "ord_missing".to_string(),
            },
        )
        .unwrap_err();
        assert_eq!(err, ShopError::not_found("Unknown orderId: ord_missing"));
    }

    #[test]
    fn empty_order_id_is_a_validation_error() {
        let shop = ShopState::default();
        let err = get_order(
            &shop,
            &GetOrderStatusInput {
                order_id: String::new(),
            },
        )
        .unwrap_err();
        assert_eq!(err, ShopError::validation("orderId is required"));
    }

    #[test]
    fn duplicate_id_is_refused_and_the_original_survives() {
        let mut shop = ShopState::default();
        let first = order("ord_1");
        put_order(&mut shop, first.clone()).unwrap();

        let mut second = order("ord_1");
        second.payment_intent_id = "pi_2".to_string();
        assert!(put_order(&mut shop, second).is_err());

        let fetched = get_order(
            &shop,
            &GetOrderStatusInput {
                order_id: "ord_1".to_string(),
            },
        )
        .unwrap();
        assert_eq!(fetched.payment_intent_id, first.payment_intent_id);
    }
}
