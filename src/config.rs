//! Environment-driven configuration.
//!
//! # Environment Variables
//!
//! - `SHOP_BIND` - Listen address (default: 0.0.0.0:8000)
//! - `SHOP_MODE` - Initial checkout protocol, `standard` or `ucp`
//!   (default: standard)
//! - `SHOP_AUTO_APPROVE` - Default confirmation policy when a caller brings
//!   no interactive capability, `true` or `false` (default: true)

use std::net::SocketAddr;

use thiserror::Error;

use crate::gateway::CheckoutProtocol;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct ShopConfig {
    pub bind: SocketAddr,
    pub mode: CheckoutProtocol,
    pub auto_approve: bool,
}

impl ShopConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind = match std::env::var("SHOP_BIND") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidEnvVar("SHOP_BIND", raw))?,
            Err(_) => SocketAddr::from(([0, 0, 0, 0], 8000)),
        };

        let mode = match std::env::var("SHOP_MODE") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidEnvVar("SHOP_MODE", raw))?,
            Err(_) => CheckoutProtocol::Standard,
        };

        let auto_approve = match std::env::var("SHOP_AUTO_APPROVE") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidEnvVar("SHOP_AUTO_APPROVE", raw))?,
            Err(_) => true,
        };

        Ok(Self {
            bind,
            mode,
            auto_approve,
        })
    }
}
