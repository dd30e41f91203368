//! Unified event bus — trait for emitting funnel analytics events from any
//! module.
//!
//! Modules accept an `Arc<dyn EventSink>` to emit events describing the
//! user's progress through the wizard and the outbound deliveries it
//! triggers.

use crate::types::{EventType, FunnelEvent};
use chrono::Utc;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Trait for emitting funnel events. The production sink logs them; tests
/// capture them.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: FunnelEvent);
}

/// No-op sink for tests and modules that don't need event emission.
pub struct NoOpSink;

impl EventSink for NoOpSink {
    fn emit(&self, _event: FunnelEvent) {}
}

/// In-memory sink that captures events for testing.
#[derive(Default)]
pub struct CaptureSink {
    events: Mutex<Vec<FunnelEvent>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<FunnelEvent> {
        self.events.lock().expect("event bus mutex poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().expect("event bus mutex poisoned").len()
    }

    pub fn count_type(&self, event_type: EventType) -> usize {
        self.events
            .lock()
            .expect("event bus mutex poisoned")
            .iter()
            .filter(|e| e.event_type == event_type)
            .count()
    }

    pub fn clear(&self) {
        self.events.lock().expect("event bus mutex poisoned").clear();
    }
}

impl EventSink for CaptureSink {
    fn emit(&self, event: FunnelEvent) {
        self.events.lock().expect("event bus mutex poisoned").push(event);
    }
}

/// Sink that logs each event through `tracing` — the production default for
/// a system with no analytics store.
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: FunnelEvent) {
        tracing::info!(
            event_type = ?event.event_type,
            session_id = %event.session_id,
            detail = event.detail.as_deref().unwrap_or(""),
            "funnel event"
        );
    }
}

/// Convenience builder for creating `FunnelEvent` with minimal boilerplate.
pub fn make_event(
    event_type: EventType,
    session_id: impl Into<String>,
    user_email: Option<String>,
    detail: Option<String>,
) -> FunnelEvent {
    FunnelEvent {
        event_id: Uuid::new_v4(),
        event_type,
        session_id: session_id.into(),
        user_email,
        detail,
        timestamp: Utc::now(),
    }
}

/// Convenience: create a no-op event bus for modules that don't need it.
pub fn noop_sink() -> Arc<dyn EventSink> {
    Arc::new(NoOpSink)
}

/// Convenience: create a capture sink for tests.
pub fn capture_sink() -> Arc<CaptureSink> {
    Arc::new(CaptureSink::new())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_sink() {
        let sink = capture_sink();
        assert_eq!(sink.count(), 0);

        sink.emit(make_event(
            EventType::SessionStarted,
            "sess-1",
            None,
            None,
        ));
        sink.emit(make_event(
            EventType::TripSubmitted,
            "sess-1",
            Some("asha@example.com".into()),
            Some("Paris, France".into()),
        ));

        assert_eq!(sink.count(), 2);
        assert_eq!(sink.count_type(EventType::SessionStarted), 1);
        assert_eq!(sink.count_type(EventType::TripSubmitted), 1);

        let events = sink.events();
        assert_eq!(events[0].session_id, "sess-1");
        assert_eq!(events[1].user_email, Some("asha@example.com".into()));
    }

    #[test]
    fn test_noop_sink() {
        let sink = noop_sink();
        // Should not panic
        sink.emit(make_event(EventType::StepEntered, "sess-1", None, None));
    }
}
