//! Tool Gateway
//!
//! One active set of schema-described callable operations, keyed by the
//! selected checkout protocol. Switching protocol swaps the whole set under a
//! single write guard, so no caller can reach a stale handler or observe an
//! empty set. Every invocation is validated against the tool's declared input
//! schema before dispatch and recorded in the audit log afterwards.

pub mod schema;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::shop::catalog;
use crate::shop::cart;
use crate::shop::checkout::{self, ConfirmationProvider};
use crate::shop::errors::ShopError;
use crate::shop::orders;
use crate::shop::payments;
use crate::shop::state::AppState;

/// The two mutually exclusive checkout protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutProtocol {
    Standard,
    Ucp,
}

impl CheckoutProtocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Ucp => "ucp",
        }
    }
}

impl std::str::FromStr for CheckoutProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "ucp" => Ok(Self::Ucp),
            other => Err(format!("unknown checkout protocol: {other}")),
        }
    }
}

/// Side-effect classification surfaced to callers as `readOnlyHint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    ReadOnly,
    Mutating,
}

/// Which logic function a descriptor dispatches to. The checkout handler is
/// installed per protocol, so swapping sets swaps the implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolHandler {
    SearchProducts,
    AddToCart,
    CreatePaymentIntent,
    CheckoutStandard,
    CheckoutUcp,
    GetOrderStatus,
}

/// The stable calling contract of one tool.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    pub side_effect: SideEffect,
    pub handler: ToolHandler,
}

impl ToolDescriptor {
    pub fn is_read_only(&self) -> bool {
        self.side_effect == SideEffect::ReadOnly
    }
}

/// The tool set installed for a protocol, built fresh on every activation.
fn tool_set(protocol: CheckoutProtocol) -> Vec<ToolDescriptor> {
    let mut tools = vec![
        ToolDescriptor {
            name: "searchProducts",
            description:
                "Search products by text and optional category. Returns matching products with ids and prices.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "q": { "type": "string", "description": "Search text" },
                    "category": {
                        "type": "string",
                        "enum": ["office", "electronics", "home"],
                        "description": "Optional category filter"
                    }
                }
            }),
            side_effect: SideEffect::ReadOnly,
            handler: ToolHandler::SearchProducts,
        },
        ToolDescriptor {
            name: "addToCart",
            description: "Add a product to the cart by productId and quantity. Returns the updated cart.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "productId": { "type": "string" },
                    "quantity": { "type": "number" }
                },
                "required": ["productId"]
            }),
            side_effect: SideEffect::Mutating,
            handler: ToolHandler::AddToCart,
        },
    ];

    match protocol {
        CheckoutProtocol::Standard => {
            tools.push(ToolDescriptor {
                name: "checkout",
                description: "Checkout the current cart. Requires user confirmation.",
                input_schema: json!({ "type": "object", "properties": {} }),
                side_effect: SideEffect::Mutating,
                handler: ToolHandler::CheckoutStandard,
            });
        }
        CheckoutProtocol::Ucp => {
            tools.push(ToolDescriptor {
                name: "createPaymentIntent",
                description:
                    "Create a payment intent for current cart total (minor units). Returns PaymentIntent.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "amountMinor": { "type": "number" }
                    }
                }),
                side_effect: SideEffect::Mutating,
                handler: ToolHandler::CreatePaymentIntent,
            });
            tools.push(ToolDescriptor {
                name: "checkout",
                description: "Checkout using a payment intent. Requires user confirmation.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "paymentIntentId": { "type": "string" }
                    }
                }),
                side_effect: SideEffect::Mutating,
                handler: ToolHandler::CheckoutUcp,
            });
            tools.push(ToolDescriptor {
                name: "getOrderStatus",
                description: "Get order details by orderId.",
                input_schema: json!({
                    "type": "object",
                    "properties": { "orderId": { "type": "string" } },
                    "required": ["orderId"]
                }),
                side_effect: SideEffect::ReadOnly,
                handler: ToolHandler::GetOrderStatus,
            });
        }
    }

    tools
}

struct ActiveToolSet {
    protocol: CheckoutProtocol,
    tools: Vec<ToolDescriptor>,
}

/// Holder of the one active tool set.
pub struct ToolGateway {
    active: RwLock<ActiveToolSet>,
}

impl ToolGateway {
    pub fn new(protocol: CheckoutProtocol) -> Self {
        Self {
            active: RwLock::new(ActiveToolSet {
                protocol,
                tools: tool_set(protocol),
            }),
        }
    }

    /// Uninstall-then-install as one guarded assignment.
    pub async fn activate(&self, protocol: CheckoutProtocol) {
        let mut active = self.active.write().await;
        *active = ActiveToolSet {
            protocol,
            tools: tool_set(protocol),
        };
        tracing::info!(protocol = protocol.as_str(), "tool set activated");
    }

    pub async fn protocol(&self) -> CheckoutProtocol {
        self.active.read().await.protocol
    }

    pub async fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.active.read().await.tools.clone()
    }

    async fn find(&self, name: &str) -> Option<ToolDescriptor> {
        self.active
            .read()
            .await
            .tools
            .iter()
            .find(|tool| tool.name == name)
            .cloned()
    }
}

/// Validates, dispatches and audits one named tool invocation. The audit
/// record is written for every call, successful or not, and never alters the
/// result itself.
pub async fn call_tool(
    state: &AppState,
    name: &str,
    input: Value,
    confirmations: Option<&dyn ConfirmationProvider>,
) -> Result<Value, ShopError> {
    let input = if input.is_null() { json!({}) } else { input };

    let result = match state.gateway.find(name).await {
        None => Err(ShopError::validation(format!("Unknown tool: {name}"))),
        Some(descriptor) => match schema::validate_input(&descriptor.input_schema, &input) {
            Err(error) => Err(error),
            Ok(()) => dispatch(state, descriptor.handler, &input, confirmations).await,
        },
    };

    state
        .events
        .record(format!("tool:{name}"), input, &result);
    result
}

async fn dispatch(
    state: &AppState,
    handler: ToolHandler,
    input: &Value,
    confirmations: Option<&dyn ConfirmationProvider>,
) -> Result<Value, ShopError> {
    let provider = confirmations.unwrap_or(state.confirmations.as_ref());

    match handler {
        ToolHandler::SearchProducts => {
            let input = parse_input(input)?;
            let mut shop = state.shop.write().await;
            to_value(catalog::search_products(&state.catalog, &mut shop, &input))
        }
        ToolHandler::AddToCart => {
            let input = parse_input(input)?;
            let mut shop = state.shop.write().await;
            cart::add_to_cart(&state.catalog, &mut shop, &input).and_then(to_value)
        }
        ToolHandler::CreatePaymentIntent => {
            let input = parse_input(input)?;
            let mut shop = state.shop.write().await;
            payments::create_payment_intent(&state.catalog, &mut shop, state.ids.as_ref(), &input)
                .and_then(to_value)
        }
        ToolHandler::CheckoutStandard => checkout::checkout_standard(state, provider)
            .await
            .and_then(to_value),
        ToolHandler::CheckoutUcp => {
            let input = parse_input(input)?;
            checkout::checkout_ucp(state, &input, provider)
                .await
                .and_then(to_value)
        }
        ToolHandler::GetOrderStatus => {
            let input = parse_input(input)?;
            let shop = state.shop.read().await;
            orders::get_order(&shop, &input).and_then(to_value)
        }
    }
}

/// Typed view of raw arguments. `null` counts as the empty object.
pub fn parse_input<T: DeserializeOwned>(raw: &Value) -> Result<T, ShopError> {
    let raw = if raw.is_null() { json!({}) } else { raw.clone() };
    serde_json::from_value(raw)
        .map_err(|error| ShopError::validation(format!("Invalid arguments: {error}")))
}

fn to_value<T: Serialize>(value: T) -> Result<Value, ShopError> {
    serde_json::to_value(value)
        .map_err(|error| ShopError::Internal(format!("serialize result: {error}")))
}
