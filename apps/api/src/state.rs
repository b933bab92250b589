use std::sync::Arc;

use crate::config::Config;
use crate::events::LedgerEvents;
use crate::identity::IdentityProvider;
use crate::llm_client::LlmClient;
use crate::store::{AdStore, PaymentStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Payment ledger, the system of record for entitlement decisions.
    pub payments: Arc<dyn PaymentStore>,
    pub ads: Arc<dyn AdStore>,
    /// Pluggable identity resolution. Default: `ClientAsserted` (the demo
    /// trusts the username the client supplies).
    pub identity: Arc<dyn IdentityProvider>,
    pub llm: LlmClient,
    pub config: Config,
    /// Ledger change notifications feeding the SSE watch route.
    pub events: LedgerEvents,
}
