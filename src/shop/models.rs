//! Shop Domain Models
//!
//! Data structures shared by the registries, the checkout protocols and both
//! calling surfaces. All monetary arithmetic is integer minor-unit arithmetic;
//! formatted strings exist only for display fields on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Currency for every amount in the shop.
pub const CURRENCY: &str = "GBP";

/// Formats minor units for display, e.g. `899` becomes `£8.99`.
pub fn format_minor(amount_minor: u64) -> String {
    format!("£{}.{:02}", amount_minor / 100, amount_minor % 100)
}

// =============================================================================
// Catalog
// =============================================================================

/// Product category, a fixed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Office,
    Electronics,
    Home,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Office => "office",
            Self::Electronics => "electronics",
            Self::Home => "home",
        }
    }
}

/// A catalog product. Seeded once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    /// Unit price in minor units.
    pub price_minor: u64,
    pub description: &'static str,
}

/// Wire view of a product as returned by search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Formatted unit price, e.g. `£8.99`.
    pub price: String,
    pub price_pence: u64,
    pub description: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.to_string(),
            category: product.category.as_str().to_string(),
            price: format_minor(product.price_minor),
            price_pence: product.price_minor,
            description: product.description.to_string(),
        }
    }
}

/// Result of a catalog search: matches in catalog order plus a count.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub count: usize,
    pub products: Vec<ProductView>,
}

// =============================================================================
// Money
// =============================================================================

/// An amount in integer minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub currency: String,
    pub amount_minor: u64,
}

impl Money {
    pub fn gbp(amount_minor: u64) -> Self {
        Self {
            currency: CURRENCY.to_string(),
            amount_minor,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A cart line derived from the ledger at read time; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub quantity: u64,
    /// Formatted unit price.
    pub unit_price: String,
    /// Formatted line total.
    pub line_total: String,
    pub line_total_pence: u64,
}

/// Derived cart view: lines, total item count and total amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub item_count: u64,
    /// Formatted total.
    pub total: String,
    pub total_pence: u64,
    pub items: Vec<CartLine>,
}

// =============================================================================
// Payment intents
// =============================================================================

/// Lifecycle of a payment intent. The transition is forward-only and happens
/// exactly once, via confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    RequiresConfirmation,
    Succeeded,
}

/// An authorized-but-unconfirmed charge. The amount is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub id: String,
    pub amount: Money,
    pub status: PaymentIntentStatus,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub name: String,
    pub quantity: u64,
    pub unit_price: Money,
    pub line_total: Money,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
}

/// A settled purchase. Written once by the UCP checkout protocol and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub currency: String,
    pub payment_intent_id: String,
    pub items: Vec<OrderLine>,
    pub totals: OrderTotals,
}

// =============================================================================
// Checkout outcomes
// =============================================================================

/// Result of a checkout protocol run. A declined confirmation is the one
/// non-exceptional failure and keeps the `ok:false` shape; every other failure
/// is a `ShopError`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CheckoutOutcome {
    /// The caller declined the confirmation prompt. State is untouched.
    #[serde(rename_all = "camelCase")]
    Cancelled {
        ok: bool,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        payment_intent: Option<PaymentIntent>,
    },
    /// Standard-protocol receipt. Transient: no order is persisted.
    #[serde(rename_all = "camelCase")]
    StandardReceipt {
        ok: bool,
        order_id: String,
        message: String,
        /// Formatted total that was charged.
        charged: String,
        items: Vec<CartLine>,
    },
    /// UCP-protocol receipt carrying the persisted order.
    #[serde(rename_all = "camelCase")]
    UcpReceipt {
        ok: bool,
        order: Order,
        payment_intent: PaymentIntent,
    },
}

impl CheckoutOutcome {
    pub fn cancelled(payment_intent: Option<PaymentIntent>) -> Self {
        Self::Cancelled {
            ok: false,
            message: "User cancelled checkout".to_string(),
            payment_intent,
        }
    }

    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Cancelled { .. })
    }
}

// =============================================================================
// Operation inputs
// =============================================================================

/// Input for searchProducts. Any value is a valid query; both dimensions
/// default to the wildcard.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchInput {
    pub q: String,
    pub category: String,
}

/// Input for addToCart. Quantity defaults to 1 when omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartInput {
    #[serde(default)]
    pub product_id: String,
    pub quantity: Option<f64>,
}

/// Input for removeFromCart.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartInput {
    #[serde(default)]
    pub product_id: String,
}

/// Input for createPaymentIntent. A missing amount falls back to the current
/// cart total.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentInput {
    pub amount_minor: Option<f64>,
}

/// Input for the UCP checkout: an optional existing intent id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UcpCheckoutInput {
    pub payment_intent_id: Option<String>,
}

/// Input for getOrderStatus.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetOrderStatusInput {
    #[serde(default)]
    pub order_id: String,
}
