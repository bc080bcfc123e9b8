//! JSON-RPC route handlers for the agent channel.
//!
//! The method surface is the tool-calling subset: handshake, tool discovery
//! and tool execution. Discovery always reflects the gateway's currently
//! active set, so a protocol switch is immediately visible to agents.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde_json::{json, Value};

use crate::gateway;
use crate::shop::state::SharedState;

use super::helpers::{error_code, rpc_error, rpc_success};
use super::models::{JsonRpcRequest, PROTOCOL_VERSION, SERVER_NAME};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/", post(handle_mcp).get(handle_mcp_sse))
        .route("/mcp", post(handle_mcp).get(handle_mcp_sse))
        .route("/mcp/", post(handle_mcp).get(handle_mcp_sse))
}

/// SSE handshake for GET requests: points the client at the POST endpoint.
async fn handle_mcp_sse() -> impl IntoResponse {
    (
        [("content-type", "text/event-stream")],
        "event: endpoint\ndata: /mcp\n\n",
    )
}

/// Endpoint: POST /mcp
async fn handle_mcp(
    State(state): State<SharedState>,
    body: Result<Json<JsonRpcRequest>, axum::extract::rejection::JsonRejection>,
) -> impl IntoResponse {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "unparseable rpc request");
            return (
                StatusCode::BAD_REQUEST,
                Json(rpc_error(Value::Null, -32700, "Parse error")),
            )
                .into_response();
        }
    };

    let id = req.id.unwrap_or(Value::Null);
    let method = req.method.as_str();
    let params = req.params.unwrap_or(Value::Null);
    tracing::debug!(%method, "rpc call");

    let response_body = match method {
        "initialize" => rpc_success(id, handle_initialize()),
        "notifications/initialized" => rpc_success(id, json!({})),
        "tools/list" => rpc_success(id, handle_tools_list(&state).await),
        "tools/call" => {
            let tool_name = params.get("name").and_then(Value::as_str).unwrap_or("");
            let args = params.get("arguments").cloned().unwrap_or(Value::Null);

            match gateway::call_tool(&state, tool_name, args, None).await {
                Ok(result) => rpc_success(id, wrap_tool_result(result)),
                Err(error) => rpc_error(id, error_code(&error), error.to_string()),
            }
        }
        "ping" => rpc_success(id, json!({})),
        _ => {
            tracing::warn!(%method, "unknown rpc method");
            rpc_error(id, -32601, "Method not found")
        }
    };

    Json(response_body).into_response()
}

/// Handshake payload. Tool lists change when the checkout protocol switches,
/// hence `listChanged`.
fn handle_initialize() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": { "listChanged": true }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

/// The active tool set as wire descriptors.
async fn handle_tools_list(state: &SharedState) -> Value {
    let tools: Vec<Value> = state
        .gateway
        .descriptors()
        .await
        .iter()
        .map(|tool| {
            json!({
                "name": tool.name,
                "description": tool.description,
                "inputSchema": tool.input_schema,
                "annotations": { "readOnlyHint": tool.is_read_only() }
            })
        })
        .collect();

    json!({ "tools": tools })
}

/// Tool results ride in the standard content envelope; the structured payload
/// carries the actual operation result.
fn wrap_tool_result(result: Value) -> Value {
    let text = serde_json::to_string_pretty(&result).unwrap_or_else(|_| result.to_string());
    json!({
        "content": [{ "type": "text", "text": text }],
        "structuredContent": result
    })
}
