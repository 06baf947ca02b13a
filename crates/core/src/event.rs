//! Domain event system — lets the presentation layer observe a session.
//!
//! The dialogue orchestrator publishes an event whenever something visible
//! happens. Subscribers (a UI, a logger) react without the orchestrator
//! knowing they exist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::context::ContextKey;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A user utterance was accepted into the transcript
    UtteranceAccepted {
        session_id: String,
        content_preview: String,
        timestamp: DateTime<Utc>,
    },

    /// The utterance supplied values for these context keys
    ContextUpdated {
        session_id: String,
        updated_keys: Vec<ContextKey>,
        timestamp: DateTime<Utc>,
    },

    /// The session entered or left the awaiting-response state
    StateChanged {
        session_id: String,
        awaiting_response: bool,
        timestamp: DateTime<Utc>,
    },

    /// The recommendation service answered
    ResponseReceived {
        session_id: String,
        candidate_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// The outbound call failed and an apology turn was recorded
    ServiceFailed {
        session_id: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Stable snake_case name for logs and subscribers.
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::UtteranceAccepted { .. } => "utterance_accepted",
            DomainEvent::ContextUpdated { .. } => "context_updated",
            DomainEvent::StateChanged { .. } => "state_changed",
            DomainEvent::ResponseReceived { .. } => "response_received",
            DomainEvent::ServiceFailed { .. } => "service_failed",
        }
    }
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(DomainEvent::ContextUpdated {
            session_id: "s1".into(),
            updated_keys: vec![ContextKey::CeilingHeight],
            timestamp: Utc::now(),
        });

        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            DomainEvent::ContextUpdated { updated_keys, .. } => {
                assert_eq!(updated_keys, &vec![ContextKey::CeilingHeight]);
            }
            _ => panic!("Expected ContextUpdated event"),
        }
    }

    #[test]
    fn event_names_are_snake_case() {
        let failed = DomainEvent::ServiceFailed {
            session_id: "s1".into(),
            error_message: "boom".into(),
            timestamp: Utc::now(),
        };
        let state = DomainEvent::StateChanged {
            session_id: "s1".into(),
            awaiting_response: true,
            timestamp: Utc::now(),
        };
        assert_eq!(failed.name(), "service_failed");
        assert_eq!(state.name(), "state_changed");
    }

    #[test]
    fn event_bus_no_subscribers_doesnt_panic() {
        let bus = EventBus::new(16);
        bus.publish(DomainEvent::ServiceFailed {
            session_id: "s1".into(),
            error_message: "no subscribers".into(),
            timestamp: Utc::now(),
        });
    }
}
