//! Shop Domain Module
//!
//! Everything commerce: the seeded catalog and search, the cart ledger, the
//! payment-intent and order registries, the two checkout protocols, the
//! failure taxonomy and the REST surface over them.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod orders;
pub mod payments;
pub mod state;

pub use handlers::routes;
pub use state::{AppState, SharedState};
