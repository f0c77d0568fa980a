//! Best-effort domain event fan-out over NATS.

use crate::domain::events::DomainEvent;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Envelope<'a> {
    occurred_at: DateTime<Utc>,
    #[serde(flatten)]
    event: &'a DomainEvent,
}

/// Publishes domain events when a NATS client is configured; otherwise a no-op.
#[derive(Clone, Default)]
pub struct EventPublisher {
    nats: Option<async_nats::Client>,
}

impl EventPublisher {
    pub fn new(nats: Option<async_nats::Client>) -> Self { Self { nats } }

    pub fn disabled() -> Self { Self::default() }

    pub fn is_enabled(&self) -> bool { self.nats.is_some() }

    pub async fn publish(&self, event: impl Into<DomainEvent>) {
        let Some(client) = &self.nats else { return };
        let event = event.into();
        let subject = event.subject();
        let payload = match encode(&event) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(subject = %subject, error = %e, "failed to encode event");
                return;
            }
        };
        if let Err(e) = client.publish(subject.clone(), payload.into()).await {
            tracing::warn!(subject = %subject, error = %e, "failed to publish event");
        }
    }
}

fn encode(event: &DomainEvent) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&Envelope { occurred_at: Utc::now(), event })
}
