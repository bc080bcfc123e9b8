//! Checkout orchestration.
//!
//! Two mutually exclusive protocols share the non-empty-cart precondition and
//! the confirmation suspension point. Each runs entirely under the shop write
//! guard, so a successful checkout and its cart clear are one atomic step to
//! every observer, and no other mutation can slip in between prompt and
//! answer.

use async_trait::async_trait;
use chrono::Utc;

use super::cart;
use super::catalog::Catalog;
use super::errors::ShopError;
use super::models::{
    format_minor, CartSnapshot, CheckoutOutcome, CreatePaymentIntentInput, Money, Order,
    OrderLine, OrderStatus, OrderTotals, PaymentIntent, UcpCheckoutInput, CURRENCY,
};
use super::orders;
use super::payments;
use super::state::AppState;

/// The two-way suspension point: issue a prompt, wait for a boolean answer.
/// Declining is cancellation, never an error, and there is no timeout.
#[async_trait]
pub trait ConfirmationProvider: Send + Sync {
    async fn request_confirmation(&self, prompt: &str) -> bool;
}

/// Synchronous default provider: a fixed approve/decline policy, so the
/// orchestration is runnable without any interactive channel.
#[derive(Debug, Clone, Copy)]
pub struct StaticConfirmation {
    approve: bool,
}

impl StaticConfirmation {
    pub fn approving() -> Self {
        Self { approve: true }
    }

    pub fn declining() -> Self {
        Self { approve: false }
    }
}

#[async_trait]
impl ConfirmationProvider for StaticConfirmation {
    async fn request_confirmation(&self, _prompt: &str) -> bool {
        self.approve
    }
}

/// Standard protocol: confirm the cart total, then clear the cart and hand
/// back a transient receipt. No order is persisted, so the receipt id can
/// never be resolved through order lookup.
pub async fn checkout_standard(
    state: &AppState,
    confirmations: &dyn ConfirmationProvider,
) -> Result<CheckoutOutcome, ShopError> {
    let mut shop = state.shop.write().await;
    let snapshot = cart::snapshot(&state.catalog, &shop);
    if snapshot.item_count == 0 {
        return Err(ShopError::business_rule("Cart is empty"));
    }

    let prompt = format!("Confirm checkout for {}?", snapshot.total);
    if !confirmations.request_confirmation(&prompt).await {
        return Ok(CheckoutOutcome::cancelled(None));
    }

    let order_id = state.ids.receipt_id();
    shop.cart.clear();

    Ok(CheckoutOutcome::StandardReceipt {
        ok: true,
        order_id,
        message: "Checkout complete".to_string(),
        charged: snapshot.total.clone(),
        items: snapshot.items,
    })
}

/// UCP protocol: resolve a payment intent, confirm its amount, then settle —
/// intent succeeded, order persisted, cart cleared — in one atomic step.
pub async fn checkout_ucp(
    state: &AppState,
    input: &UcpCheckoutInput,
    confirmations: &dyn ConfirmationProvider,
) -> Result<CheckoutOutcome, ShopError> {
    let mut shop = state.shop.write().await;
    let snapshot = cart::snapshot(&state.catalog, &shop);
    if snapshot.item_count == 0 {
        return Err(ShopError::business_rule("Cart is empty"));
    }

    let supplied = input.payment_intent_id.as_deref().filter(|id| !id.is_empty());
    let intent = match supplied {
        Some(id) => payments::get_payment_intent(&shop, id)?,
        None => payments::create_payment_intent(
            &state.catalog,
            &mut shop,
            state.ids.as_ref(),
            &CreatePaymentIntentInput {
                amount_minor: Some(snapshot.total_pence as f64),
            },
        )?,
    };

    let prompt = format!(
        "Confirm checkout for {}?",
        format_minor(intent.amount.amount_minor)
    );
    if !confirmations.request_confirmation(&prompt).await {
        return Ok(CheckoutOutcome::cancelled(Some(intent)));
    }

    let confirmed = payments::confirm_payment_intent(&mut shop, &intent.id)?;
    let order = build_order(&state.catalog, state.ids.order_id(), &confirmed, &snapshot);
    orders::put_order(&mut shop, order.clone())?;
    shop.cart.clear();

    Ok(CheckoutOutcome::UcpReceipt {
        ok: true,
        order,
        payment_intent: confirmed,
    })
}

/// An order settled from a cart snapshot: line items from the snapshot, tax
/// and shipping zero, subtotal and total equal to the intent's amount.
fn build_order(
    catalog: &Catalog,
    id: String,
    intent: &PaymentIntent,
    snapshot: &CartSnapshot,
) -> Order {
    let items = snapshot
        .items
        .iter()
        .map(|line| {
            let product = catalog.find(&line.product_id);
            OrderLine {
                product_id: line.product_id.clone(),
                name: line.name.clone(),
                quantity: line.quantity,
                unit_price: Money::gbp(product.map_or(0, |p| p.price_minor)),
                line_total: Money::gbp(line.line_total_pence),
                category: product.map_or_else(
                    || "unknown".to_string(),
                    |p| p.category.as_str().to_string(),
                ),
            }
        })
        .collect();

    Order {
        id,
        status: OrderStatus::Confirmed,
        created_at: Utc::now(),
        currency: CURRENCY.to_string(),
        payment_intent_id: intent.id.clone(),
        items,
        totals: OrderTotals {
            subtotal: Money::gbp(intent.amount.amount_minor),
            tax: Money::gbp(0),
            shipping: Money::gbp(0),
            total: Money::gbp(intent.amount.amount_minor),
        },
    }
}
