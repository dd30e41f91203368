//! Inbound event channel — a typed mpsc with a single consumer replaces the
//! window-global hooks the widget expects. Producers (the REST surface, the
//! embed page) push events; one task decides what gets forwarded.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use door_core::event_bus::{make_event, EventSink};
use door_core::notify::{Notification, Notifier};
use door_core::types::EventType;
use door_outbound::WebhookClient;

use crate::extractor::TranscriptExtractor;
use crate::normalizer::{normalize, stamp};

/// Event-type markers that identify a finished conversation message.
pub const EVENT_MARKERS: [&str; 2] = ["vapi.conversation.finished", "conversation.complete"];

/// Payload keys that mark a message as carrying captured form data.
pub const PAYLOAD_KEYS: [&str; 3] = ["answers", "form", "responses"];

/// An inbound event from the widget integration surface.
#[derive(Debug, Clone)]
pub enum VoiceInbound {
    /// The globally exposed entry point: always forwarded.
    DirectSubmit(Value),
    /// A cross-context window message: forwarded only when recognized.
    WindowMessage(Value),
    /// Free-text conversation content routed through the heuristic
    /// extractor.
    Transcript(String),
}

/// Producer handle onto the bridge channel.
#[derive(Clone)]
pub struct VoiceBridgeHandle {
    tx: mpsc::Sender<VoiceInbound>,
}

impl VoiceBridgeHandle {
    /// Enqueue an inbound event. A full or closed channel drops the event —
    /// every path here is best-effort.
    pub fn push(&self, inbound: VoiceInbound) {
        if let Err(e) = self.tx.try_send(inbound) {
            warn!(error = %e, "voice inbound dropped, channel unavailable");
        }
    }
}

/// Consumes inbound widget events and forwards recognized payloads to the
/// voice webhook.
pub struct VoiceBridge {
    client: Arc<WebhookClient>,
    notifier: Arc<dyn Notifier>,
    event_sink: Arc<dyn EventSink>,
    extractor: TranscriptExtractor,
    url: String,
}

impl VoiceBridge {
    pub fn new(client: Arc<WebhookClient>, url: String) -> Self {
        Self {
            client,
            notifier: door_core::notify::noop_notifier(),
            event_sink: door_core::event_bus::noop_sink(),
            extractor: TranscriptExtractor::new(),
            url,
        }
    }

    /// Attach a notifier; only the transcript path surfaces anything.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Attach an event sink for emitting funnel events.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Returns `true` if a window message should be forwarded: a known
    /// event-type marker, or any recognized payload key.
    pub fn should_forward(payload: &Value) -> bool {
        let marker = payload
            .get("type")
            .or_else(|| payload.get("event"))
            .and_then(Value::as_str)
            .map(|t| EVENT_MARKERS.contains(&t))
            .unwrap_or(false);

        marker || PAYLOAD_KEYS.iter().any(|key| payload.get(key).is_some())
    }

    /// Spawns the single consumer task and returns the producer handle.
    pub fn spawn(self, buffer: usize) -> (VoiceBridgeHandle, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(buffer);
        let task = tokio::spawn(async move {
            while let Some(inbound) = rx.recv().await {
                self.handle(inbound).await;
            }
            debug!("voice bridge channel closed");
        });
        (VoiceBridgeHandle { tx }, task)
    }

    async fn handle(&self, inbound: VoiceInbound) {
        match inbound {
            VoiceInbound::DirectSubmit(payload) => {
                self.forward(normalize(&payload), "direct_submit").await;
            }
            VoiceInbound::WindowMessage(payload) => {
                if Self::should_forward(&payload) {
                    self.forward(normalize(&payload), "window_message").await;
                } else {
                    debug!("voice window message ignored");
                    self.event_sink.emit(make_event(
                        EventType::VoiceDropped,
                        "voice",
                        None,
                        None,
                    ));
                }
            }
            VoiceInbound::Transcript(text) => self.handle_transcript(&text).await,
        }
    }

    async fn handle_transcript(&self, text: &str) {
        match self.extractor.extract(text) {
            Some(fields) => {
                self.event_sink.emit(make_event(
                    EventType::VoiceExtracted,
                    "voice",
                    None,
                    None,
                ));
                let forwarded = self.forward(stamp(fields), "transcript").await;
                if forwarded {
                    self.notifier.notify(Notification::info(
                        "Got it!",
                        "We heard your trip details and sent them to our planner.",
                    ));
                }
            }
            None => {
                debug!("transcript yielded no trip fields, dropped");
                self.event_sink
                    .emit(make_event(EventType::VoiceDropped, "voice", None, None));
            }
        }
    }

    /// Fire-and-forget POST. Failures are logged, never surfaced.
    async fn forward(&self, payload: Value, path: &str) -> bool {
        match self.client.dispatch(&self.url, payload).await {
            Ok(delivery) if delivery.success => {
                info!(path, "voice payload forwarded");
                self.event_sink.emit(make_event(
                    EventType::VoiceForwarded,
                    "voice",
                    None,
                    Some(path.to_string()),
                ));
                true
            }
            Ok(delivery) => {
                warn!(path, status = ?delivery.response_status, "voice forward rejected");
                false
            }
            Err(e) => {
                warn!(path, error = %e, "voice forward failed");
                false
            }
        }
    }
}
