//! Router composition: the JSON-RPC endpoint, the REST surface, request
//! logging and permissive CORS for local development.

use axum::{body::Body, extract::Request, middleware::Next, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::shop::state::SharedState;

pub fn create_app_router(state: SharedState) -> Router {
    let log_layer = axum::middleware::from_fn(|req: Request<Body>, next: Next| async move {
        let method = req.method().clone();
        let uri = req.uri().clone();
        let res = next.run(req).await;
        if res.status().is_success() {
            tracing::debug!(%method, %uri, status = %res.status(), "request");
        } else {
            tracing::info!(%method, %uri, status = %res.status(), "request failed");
        }
        res
    });

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(crate::mcp::routes())
        .merge(crate::shop::routes())
        .layer(log_layer)
        .layer(cors_layer)
        .with_state(state)
}
