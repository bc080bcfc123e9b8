//! Agent-facing JSON-RPC module: envelope models, RPC helpers and the route
//! handlers for `/mcp`.

pub mod handlers;
pub mod helpers;
pub mod models;

pub use handlers::routes;
