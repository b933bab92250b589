//! Ledger change notifications.
//!
//! Submission and approval publish onto a process-wide broadcast channel;
//! the SSE watch route bridges it to clients so they can refresh entitlement
//! state on push instead of polling on a timer. Events are a refresh hint,
//! not a durable feed; a lagged subscriber skips what it missed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerEventKind {
    Submitted,
    Approved,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEvent {
    pub kind: LedgerEventKind,
    pub username: String,
    pub template_id: String,
    pub at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct LedgerEvents {
    tx: broadcast::Sender<LedgerEvent>,
}

impl LedgerEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publishes an event. A send with no live subscribers is not an error.
    pub fn publish(&self, event: LedgerEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.tx.subscribe()
    }
}

impl Default for LedgerEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_event(kind: LedgerEventKind) -> LedgerEvent {
        LedgerEvent {
            kind,
            username: "alice".to_string(),
            template_id: "modern".to_string(),
            at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let events = LedgerEvents::new();
        let mut rx = events.subscribe();
        events.publish(make_event(LedgerEventKind::Approved));
        let got = rx.recv().await.unwrap();
        assert_eq!(got.kind, LedgerEventKind::Approved);
        assert_eq!(got.username, "alice");
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let events = LedgerEvents::new();
        events.publish(make_event(LedgerEventKind::Submitted));
    }
}
