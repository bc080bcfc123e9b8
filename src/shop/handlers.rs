//! REST handlers: the plain-call surface consumed by the human-facing
//! boundary. Every endpoint runs the same logic functions the tools dispatch
//! to, and every call lands in the same audit log under a `ui:` name.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::gateway::{self, CheckoutProtocol};

use super::cart;
use super::catalog;
use super::checkout;
use super::errors::ShopError;
use super::models::{
    AddToCartInput, CartSnapshot, CheckoutOutcome, CreatePaymentIntentInput,
    GetOrderStatusInput, Order, PaymentIntent, RemoveFromCartInput, SearchInput, SearchResult,
    UcpCheckoutInput,
};
use super::orders;
use super::payments;
use super::state::{SharedState, ToolEvent};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/search", post(search))
        .route("/api/cart", get(get_cart))
        .route("/api/cart/add", post(add_to_cart))
        .route("/api/cart/remove", post(remove_from_cart))
        .route("/api/payment_intents", post(create_payment_intent))
        .route("/api/checkout", post(run_checkout))
        .route("/api/orders/:order_id", get(get_order_status))
        .route("/api/mode", post(set_mode))
        .route("/api/activity", get(activity))
        .route("/api/demo/add_first", post(demo_add_first))
}

/// Endpoint: POST /api/search
async fn search(
    State(state): State<SharedState>,
    Json(raw): Json<Value>,
) -> Result<Json<SearchResult>, ShopError> {
    let input: SearchInput = gateway::parse_input(&raw)?;
    let mut shop = state.shop.write().await;
    let result = catalog::search_products(&state.catalog, &mut shop, &input);
    drop(shop);

    state.events.record("ui:search", raw, &Ok::<_, ShopError>(&result));
    Ok(Json(result))
}

/// Endpoint: GET /api/cart
async fn get_cart(State(state): State<SharedState>) -> Json<CartSnapshot> {
    let shop = state.shop.read().await;
    Json(cart::snapshot(&state.catalog, &shop))
}

/// Endpoint: POST /api/cart/add
async fn add_to_cart(
    State(state): State<SharedState>,
    Json(raw): Json<Value>,
) -> Result<Json<CartSnapshot>, ShopError> {
    let input: AddToCartInput = gateway::parse_input(&raw)?;
    let mut shop = state.shop.write().await;
    let result = cart::add_to_cart(&state.catalog, &mut shop, &input);
    drop(shop);

    state.events.record("ui:addToCart", raw, &result);
    result.map(Json)
}

/// Endpoint: POST /api/cart/remove
async fn remove_from_cart(
    State(state): State<SharedState>,
    Json(raw): Json<Value>,
) -> Result<Json<CartSnapshot>, ShopError> {
    let input: RemoveFromCartInput = gateway::parse_input(&raw)?;
    let mut shop = state.shop.write().await;
    let result = cart::remove_from_cart(&state.catalog, &mut shop, &input);
    drop(shop);

    state.events.record("ui:removeFromCart", raw, &result);
    result.map(Json)
}

/// Endpoint: POST /api/payment_intents
///
/// Offered only while the UCP protocol is active, the same way the tool is.
async fn create_payment_intent(
    State(state): State<SharedState>,
    Json(raw): Json<Value>,
) -> Result<Json<PaymentIntent>, ShopError> {
    if state.gateway.protocol().await != CheckoutProtocol::Ucp {
        return Err(ShopError::business_rule(
            "createPaymentIntent requires ucp mode",
        ));
    }

    let input: CreatePaymentIntentInput = gateway::parse_input(&raw)?;
    let mut shop = state.shop.write().await;
    let result =
        payments::create_payment_intent(&state.catalog, &mut shop, state.ids.as_ref(), &input);
    drop(shop);

    state.events.record("ui:createPaymentIntent", raw, &result);
    result.map(Json)
}

/// Endpoint: POST /api/checkout
///
/// Runs whichever protocol is active. A declined confirmation is a normal
/// 200 with `ok:false`, never an error status.
async fn run_checkout(
    State(state): State<SharedState>,
    Json(raw): Json<Value>,
) -> Result<Json<CheckoutOutcome>, ShopError> {
    let result = match state.gateway.protocol().await {
        CheckoutProtocol::Standard => {
            checkout::checkout_standard(&state, state.confirmations.as_ref()).await
        }
        CheckoutProtocol::Ucp => {
            let input: UcpCheckoutInput = gateway::parse_input(&raw)?;
            checkout::checkout_ucp(&state, &input, state.confirmations.as_ref()).await
        }
    };

    state.events.record("ui:checkout", raw, &result);
    result.map(Json)
}

/// Endpoint: GET /api/orders/{orderId}
async fn get_order_status(
    State(state): State<SharedState>,
    Path(order_id): Path<String>,
) -> Result<Json<Order>, ShopError> {
    let input = GetOrderStatusInput {
        order_id: order_id.clone(),
    };
    let shop = state.shop.read().await;
    let result = orders::get_order(&shop, &input);
    drop(shop);

    state
        .events
        .record("ui:getOrderStatus", json!({ "orderId": order_id }), &result);
    result.map(Json)
}

#[derive(Debug, Deserialize)]
struct ModeInput {
    mode: CheckoutProtocol,
}

#[derive(Debug, Serialize)]
struct ModeResponse {
    mode: CheckoutProtocol,
}

/// Endpoint: POST /api/mode
///
/// Atomically re-keys the active tool set to the requested protocol.
async fn set_mode(
    State(state): State<SharedState>,
    Json(input): Json<ModeInput>,
) -> Json<ModeResponse> {
    state.gateway.activate(input.mode).await;
    Json(ModeResponse { mode: input.mode })
}

/// Endpoint: GET /api/activity — the caller-visible audit trail.
async fn activity(State(state): State<SharedState>) -> Json<Vec<ToolEvent>> {
    Json(state.events.recent())
}

/// Endpoint: POST /api/demo/add_first
///
/// Adds one unit of the first id in the last search results, the same path an
/// agent would take after a search.
async fn demo_add_first(
    State(state): State<SharedState>,
) -> Result<Json<CartSnapshot>, ShopError> {
    let mut shop = state.shop.write().await;
    let Some(first) = shop.last_results.first().cloned() else {
        drop(shop);
        let error = ShopError::business_rule("Search first (no results to add).");
        let failure: Result<Value, ShopError> = Err(error.clone());
        state.events.record("demo:addToCart", json!({}), &failure);
        return Err(error);
    };

    let input = AddToCartInput {
        product_id: first.clone(),
        quantity: Some(1.0),
    };
    let result = cart::add_to_cart(&state.catalog, &mut shop, &input);
    drop(shop);

    state.events.record(
        "demo:addToCart",
        json!({ "productId": first, "quantity": 1 }),
        &result,
    );
    result.map(Json)
}
