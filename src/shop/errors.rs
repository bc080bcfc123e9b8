//! Failure taxonomy for the operation layer.
//!
//! Every variant is terminal for the current call: nothing is retried, the
//! gateway records the failure and returns it to the caller unchanged. A
//! declined checkout confirmation is *not* an error and never appears here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShopError {
    /// Caller-fixable input problem: missing or malformed required field,
    /// non-positive quantity or amount.
    #[error("{0}")]
    Validation(String),
    /// Unknown product, payment intent or order id. The message carries the
    /// offending id verbatim.
    #[error("{0}")]
    NotFound(String),
    /// Well-formed input whose precondition failed, e.g. checkout on an empty
    /// cart.
    #[error("{0}")]
    BusinessRule(String),
    /// Infrastructure failure no caller input can provoke.
    #[error("{0}")]
    Internal(String),
}

impl ShopError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRule(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BusinessRule(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ShopError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        assert_eq!(
            ShopError::validation("productId is required").status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn not_found_maps_to_not_found() {
        assert_eq!(
            ShopError::not_found("Unknown productId: p9").status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn business_rule_maps_to_conflict() {
        assert_eq!(
            ShopError::business_rule("Cart is empty").status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn message_is_surfaced_verbatim() {
        let error = ShopError::not_found("Unknown orderId: ord_missing");
        assert_eq!(error.to_string(), "Unknown orderId: ord_missing");
    }
}
