//! Payment intent registry operations.

use chrono::Utc;

use super::cart;
use super::catalog::Catalog;
use super::errors::ShopError;
use super::models::{CreatePaymentIntentInput, Money, PaymentIntent, PaymentIntentStatus};
use super::state::{IdGenerator, ShopState};

/// Creates an intent for the given amount, or for the current cart total when
/// no amount is supplied. The amount is fixed for the intent's lifetime.
pub fn create_payment_intent(
    catalog: &Catalog,
    shop: &mut ShopState,
    ids: &dyn IdGenerator,
    input: &CreatePaymentIntentInput,
) -> Result<PaymentIntent, ShopError> {
    let resolved = input
        .amount_minor
        .unwrap_or_else(|| cart::snapshot(catalog, shop).total_pence as f64);
    if !resolved.is_finite() || resolved <= 0.0 {
        return Err(ShopError::validation(
            "amountMinor must be > 0 (or cart must be non-empty)",
        ));
    }

    let intent = PaymentIntent {
        id: ids.payment_intent_id(),
        amount: Money::gbp(resolved.round() as u64),
        status: PaymentIntentStatus::RequiresConfirmation,
        created_at: Utc::now(),
    };
    shop.intents.insert(intent.id.clone(), intent.clone());
    Ok(intent)
}

pub fn get_payment_intent(shop: &ShopState, id: &str) -> Result<PaymentIntent, ShopError> {
    shop.intents
        .get(id)
        .cloned()
        .ok_or_else(|| ShopError::not_found(format!("Unknown paymentIntentId: {id}")))
}

/// Moves the intent forward to `succeeded`, keeping id, amount and creation
/// time identical. There is no transition out of `succeeded`.
pub fn confirm_payment_intent(shop: &mut ShopState, id: &str) -> Result<PaymentIntent, ShopError> {
    let intent = shop
        .intents
        .get_mut(id)
        .ok_or_else(|| ShopError::not_found(format!("Unknown paymentIntentId: {id}")))?;
    intent.status = PaymentIntentStatus::Succeeded;
    Ok(intent.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shop::models::AddToCartInput;
    use crate::shop::state::SequentialIds;

    #[test]
    fn intent_defaults_to_the_cart_total() {
        let catalog = Catalog::seeded();
        let mut shop = ShopState::default();
        let ids = SequentialIds::default();
        cart::add_to_cart(
            &catalog,
            &mut shop,
            &AddToCartInput {
                product_id: "p1".to_string(),
                quantity: Some(2.0),
            },
        )
        .unwrap();

        let intent =
            create_payment_intent(&catalog, &mut shop, &ids, &CreatePaymentIntentInput::default())
                .unwrap();

        assert_eq!(intent.amount.amount_minor, 1798);
        assert_eq!(intent.status, PaymentIntentStatus::RequiresConfirmation);
        assert_eq!(intent.id, "pi_1");
    }

    #[test]
    fn empty_cart_without_explicit_amount_is_rejected() {
        let catalog = Catalog::seeded();
        let mut shop = ShopState::default();
        let ids = SequentialIds::default();

        let err =
            create_payment_intent(&catalog, &mut shop, &ids, &CreatePaymentIntentInput::default())
                .unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
        assert!(shop.intents.is_empty());
    }

    #[test]
    fn explicit_amount_wins_over_the_cart() {
        let catalog = Catalog::seeded();
        let mut shop = ShopState::default();
        let ids = SequentialIds::default();

        let intent = create_payment_intent(
            &catalog,
            &mut shop,
            &ids,
            &CreatePaymentIntentInput {
                amount_minor: Some(2500.0),
            },
        )
        .unwrap();
        assert_eq!(intent.amount.amount_minor, 2500);
    }

    #[test]
    fn confirm_moves_the_stored_intent_to_succeeded() {
        let catalog = Catalog::seeded();
        let mut shop = ShopState::default();
        let ids = SequentialIds::default();
        let intent = create_payment_intent(
            &catalog,
            &mut shop,
            &ids,
            &CreatePaymentIntentInput {
                amount_minor: Some(100.0),
            },
        )
        .unwrap();

        let confirmed = confirm_payment_intent(&mut shop, &intent.id).unwrap();

        assert_eq!(confirmed.status, PaymentIntentStatus::Succeeded);
        assert_eq!(confirmed.amount, intent.amount);
        assert_eq!(confirmed.created_at, intent.created_at);
        assert_eq!(
            get_payment_intent(&shop, &intent.id).unwrap().status,
            PaymentIntentStatus::Succeeded
        );
    }

    #[test]
    fn unknown_intent_id_is_a_not_found_error() {
        let shop = ShopState::default();
        let err = get_payment_intent(&shop, "pi_missing").unwrap_err();
        assert_eq!(err, ShopError::not_found("Unknown paymentIntentId: pi_missing"));
    }
}
