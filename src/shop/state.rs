//! Shop State Management
//!
//! All mutable registries live in one [`ShopState`] value behind a single
//! `RwLock`: a single logical writer. Mutations hold the write guard for
//! their full duration (checkout holds it across the confirmation suspension
//! point), so readers always observe a state consistent with one point in
//! the mutation sequence.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::gateway::{CheckoutProtocol, ToolGateway};

use super::catalog::Catalog;
use super::checkout::{ConfirmationProvider, StaticConfirmation};
use super::errors::ShopError;
use super::models::{Order, PaymentIntent};

/// Shared application state, cheap to clone across handlers.
pub type SharedState = Arc<AppState>;

/// The mutable registries. `BTreeMap` keeps derived views in a stable order.
#[derive(Debug, Default)]
pub struct ShopState {
    /// Cart ledger: product id to quantity, quantity > 0 while present.
    pub cart: BTreeMap<String, u64>,
    pub intents: BTreeMap<String, PaymentIntent>,
    pub orders: BTreeMap<String, Order>,
    /// Ordered ids of the most recent search results.
    pub last_results: Vec<String>,
}

/// Application state: the immutable catalog, the lock-guarded registries, the
/// active tool set and the injected collaborators.
pub struct AppState {
    pub catalog: Catalog,
    pub shop: RwLock<ShopState>,
    pub gateway: ToolGateway,
    pub ids: Arc<dyn IdGenerator>,
    pub confirmations: Arc<dyn ConfirmationProvider>,
    pub events: EventLog,
}

impl AppState {
    /// State for the given protocol with production collaborators: random ids
    /// and a fixed confirmation policy.
    pub fn new(protocol: CheckoutProtocol, auto_approve: bool) -> Self {
        let confirmations: Arc<dyn ConfirmationProvider> = if auto_approve {
            Arc::new(StaticConfirmation::approving())
        } else {
            Arc::new(StaticConfirmation::declining())
        };
        Self::with_parts(protocol, Arc::new(UuidIds), confirmations)
    }

    /// State with injected id generation and confirmation handling.
    pub fn with_parts(
        protocol: CheckoutProtocol,
        ids: Arc<dyn IdGenerator>,
        confirmations: Arc<dyn ConfirmationProvider>,
    ) -> Self {
        let catalog = Catalog::seeded();
        // Before any search runs, "last results" means the whole catalog.
        let shop = ShopState {
            last_results: catalog.products().iter().map(|p| p.id.to_string()).collect(),
            ..ShopState::default()
        };
        Self {
            catalog,
            shop: RwLock::new(shop),
            gateway: ToolGateway::new(protocol),
            ids,
            confirmations,
            events: EventLog::default(),
        }
    }
}

// =============================================================================
// Id generation
// =============================================================================

/// Injectable id source so tests can assert deterministic ids.
pub trait IdGenerator: Send + Sync {
    fn payment_intent_id(&self) -> String;
    fn order_id(&self) -> String;
    /// Transient receipt id used by the Standard protocol.
    fn receipt_id(&self) -> String;
}

/// Random ids in the wire shapes: `pi_1a2b3c4d`, `ord_1a2b3c4d`, `ORD-1A2B3C`.
#[derive(Debug, Default)]
pub struct UuidIds;

impl UuidIds {
    fn hex(len: usize) -> String {
        let mut hex = Uuid::new_v4().simple().to_string();
        hex.truncate(len);
        hex
    }
}

impl IdGenerator for UuidIds {
    fn payment_intent_id(&self) -> String {
        format!("pi_{}", Self::hex(8))
    }

    fn order_id(&self) -> String {
        format!("ord_{}", Self::hex(8))
    }

    fn receipt_id(&self) -> String {
        format!("ORD-{}", Self::hex(6).to_uppercase())
    }
}

/// Deterministic counter-based ids: `pi_1`, `ord_2`, `ORD-3`, ...
#[derive(Debug, Default)]
pub struct SequentialIds(AtomicU64);

impl SequentialIds {
    fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl IdGenerator for SequentialIds {
    fn payment_intent_id(&self) -> String {
        format!("pi_{}", self.next())
    }

    fn order_id(&self) -> String {
        format!("ord_{}", self.next())
    }

    fn receipt_id(&self) -> String {
        format!("ORD-{}", self.next())
    }
}

// =============================================================================
// Tool event audit log
// =============================================================================

/// One gateway or surface invocation: name, raw input, and how it ended.
#[derive(Debug, Clone, Serialize)]
pub struct ToolEvent {
    pub event: String,
    pub input: Value,
    #[serde(flatten)]
    pub outcome: EventOutcome,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EventOutcome {
    Success { result: Value },
    Failure { error: String },
}

const EVENT_CAPACITY: usize = 64;

/// Bounded, most-recent-first audit trail. Recording is a side effect and
/// never influences the recorded operation's own result.
#[derive(Default)]
pub struct EventLog {
    entries: Mutex<VecDeque<ToolEvent>>,
}

impl EventLog {
    pub fn record<T: Serialize>(
        &self,
        event: impl Into<String>,
        input: Value,
        result: &Result<T, ShopError>,
    ) {
        let event = event.into();
        let outcome = match result {
            Ok(value) => EventOutcome::Success {
                result: serde_json::to_value(value).unwrap_or(Value::Null),
            },
            Err(error) => EventOutcome::Failure {
                error: error.to_string(),
            },
        };
        match &outcome {
            EventOutcome::Success { .. } => tracing::info!(%event, "ok"),
            EventOutcome::Failure { error } => tracing::warn!(%event, %error, "failed"),
        }

        // A poisoned log only costs audit entries, never the operation.
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        entries.push_front(ToolEvent {
            event,
            input,
            outcome,
            at: Utc::now(),
        });
        entries.truncate(EVENT_CAPACITY);
    }

    pub fn recent(&self) -> Vec<ToolEvent> {
        self.entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }
}
