//! After-commit domain event publishing
//!
//! Use cases publish their events only once the unit of work has committed.
//! Publishing is best-effort: a failure is logged and never undoes the commit.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::usecase::DomainEvent;

/// CloudEvents-style envelope handed to subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub spec_version: String,
    pub source: String,
    pub subject: String,
    pub time: DateTime<Utc>,
    pub data_content_type: String,
    pub data: serde_json::Value,
    pub message_group: String,
    pub execution_id: String,
    pub correlation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub causation_id: Option<String>,
    pub principal_id: String,
}

impl EventEnvelope {
    pub fn from_event(event: &dyn DomainEvent) -> Self {
        let mut data: serde_json::Value =
            serde_json::from_str(&event.to_data_json()).unwrap_or(serde_json::json!({}));
        if let Some(object) = data.as_object_mut() {
            object.remove("metadata");
        }

        Self {
            id: event.event_id().to_string(),
            event_type: event.event_type().to_string(),
            spec_version: event.spec_version().to_string(),
            source: event.source().to_string(),
            subject: event.subject().to_string(),
            time: event.time(),
            data_content_type: "application/json".to_string(),
            data,
            message_group: event.message_group().to_string(),
            execution_id: event.execution_id().to_string(),
            correlation_id: event.correlation_id().to_string(),
            causation_id: event.causation_id().map(String::from),
            principal_id: event.principal_id().to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("no active subscribers for {event_type}")]
    NoSubscribers { event_type: String },
}

pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: &dyn DomainEvent) -> Result<(), PublishError>;
}

/// Publish and log a warning on failure.
pub fn publish_or_warn(publisher: &dyn EventPublisher, event: &dyn DomainEvent) {
    if let Err(e) = publisher.publish(event) {
        warn!(
            event_id = event.event_id(),
            event_type = event.event_type(),
            error = %e,
            "Failed to publish domain event"
        );
    }
}

/// Fans events out over a `tokio::sync::broadcast` channel.
pub struct ChannelEventPublisher {
    sender: broadcast::Sender<EventEnvelope>,
    log_events: bool,
}

impl ChannelEventPublisher {
    pub fn new(capacity: usize, log_events: bool) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender, log_events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }
}

impl EventPublisher for ChannelEventPublisher {
    fn publish(&self, event: &dyn DomainEvent) -> Result<(), PublishError> {
        let envelope = EventEnvelope::from_event(event);
        if self.log_events {
            info!(
                event_id = %envelope.id,
                event_type = %envelope.event_type,
                subject = %envelope.subject,
                "Publishing domain event"
            );
        }
        self.sender
            .send(envelope)
            .map(|_| ())
            .map_err(|e| PublishError::NoSubscribers {
                event_type: e.0.event_type,
            })
    }
}

/// Keeps every published event in memory.
#[derive(Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<EventEnvelope>>,
}

impl RecordingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EventEnvelope> {
        self.events.lock().clone()
    }

    pub fn event_types(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.event_type.clone()).collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventPublisher for RecordingEventPublisher {
    fn publish(&self, event: &dyn DomainEvent) -> Result<(), PublishError> {
        self.events.lock().push(EventEnvelope::from_event(event));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impl_domain_event;
    use crate::usecase::{EventMetadata, ExecutionContext};

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct RegionRenamed {
        metadata: EventMetadata,
        region_id: String,
    }

    impl_domain_event!(RegionRenamed);

    fn event() -> RegionRenamed {
        let ctx = ExecutionContext::create("editor");
        RegionRenamed {
            metadata: EventMetadata::for_aggregate(&ctx, "cms:pages:region:renamed", "cms:pages", "region", "R1"),
            region_id: "R1".to_string(),
        }
    }

    #[test]
    fn test_envelope_strips_metadata_from_data() {
        let envelope = EventEnvelope::from_event(&event());
        assert_eq!(envelope.data, serde_json::json!({ "regionId": "R1" }));
        assert_eq!(envelope.subject, "cms.region.R1");
    }

    #[tokio::test]
    async fn test_channel_delivers_to_subscriber() {
        let publisher = ChannelEventPublisher::new(8, false);
        let mut rx = publisher.subscribe();
        publisher.publish(&event()).unwrap();
        let received = rx.recv().await.unwrap();
        assert_eq!(received.event_type, "cms:pages:region:renamed");
    }

    #[test]
    fn test_channel_without_subscribers_reports_error() {
        let publisher = ChannelEventPublisher::new(8, false);
        assert!(matches!(
            publisher.publish(&event()),
            Err(PublishError::NoSubscribers { .. })
        ));
        // best-effort wrapper swallows it
        publish_or_warn(&publisher, &event());
    }

    #[test]
    fn test_recording_publisher() {
        let publisher = RecordingEventPublisher::new();
        publisher.publish(&event()).unwrap();
        assert_eq!(publisher.event_types(), vec!["cms:pages:region:renamed"]);
        publisher.clear();
        assert!(publisher.events().is_empty());
    }
}
