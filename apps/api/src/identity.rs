//! Identity resolution — pluggable, trait-based.
//!
//! The reference product trusts a client-supplied username string as the
//! whole identity. That policy lives behind `IdentityProvider` so a real
//! auth backend can be swapped in without touching entitlement logic.
//!
//! `AppState` holds an `Arc<dyn IdentityProvider>`.

use std::sync::Arc;

/// A resolved user identity. Today this is just the asserted username;
/// a real provider would carry a verified subject here instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub trait IdentityProvider: Send + Sync {
    /// Resolves a raw client claim to an identity. `None` means anonymous;
    /// entitlement evaluation treats anonymous callers as always locked.
    fn resolve(&self, raw: Option<&str>) -> Option<UserId>;
}

/// The demo provider: accept whatever the client asserts, minus whitespace.
/// Empty or missing claims resolve to anonymous.
pub struct ClientAsserted;

impl IdentityProvider for ClientAsserted {
    fn resolve(&self, raw: Option<&str>) -> Option<UserId> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(UserId(trimmed.to_string()))
    }
}

pub fn default_provider() -> Arc<dyn IdentityProvider> {
    Arc::new(ClientAsserted)
}
