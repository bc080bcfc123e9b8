//! JSON-RPC protocol models and constants for the agent-facing endpoint.

use serde::Deserialize;
use serde_json::Value;

/// Server identifier reported during the handshake.
pub const SERVER_NAME: &str = "mini-shop-rust";
/// Protocol version spoken on `/mcp`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Standard JSON-RPC 2.0 request envelope.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version (should be "2.0").
    #[allow(dead_code)]
    pub jsonrpc: Option<String>,

    /// Method name to invoke.
    pub method: String,

    /// Parameters for the method.
    pub params: Option<Value>,

    /// Request identifier.
    pub id: Option<Value>,
}
