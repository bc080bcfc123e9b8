//! JSON-RPC envelope construction and error-code mapping.

use serde_json::{json, Value};

use crate::shop::errors::ShopError;

/// Success envelope echoing the request id.
pub fn rpc_success(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
}

/// Error envelope echoing the request id (or `null` when unavailable).
pub fn rpc_error(id: Value, code: i32, message: impl Into<String>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message.into(),
        }
    })
}

/// JSON-RPC code for each failure class. Validation failures (including an
/// unknown tool name) are invalid params; entity lookups and business rules
/// get their own codes so callers can tell them apart.
pub fn error_code(error: &ShopError) -> i32 {
    match error {
        ShopError::Validation(_) => -32602,
        ShopError::NotFound(_) => -32001,
        ShopError::BusinessRule(_) => -32002,
        ShopError::Internal(_) => -32603,
    }
}
