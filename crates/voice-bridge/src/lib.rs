//! Voice widget bridge — embed configuration for the third-party
//! conversational widget and best-effort forwarding of whatever it captures
//! to the workflow webhook.
//!
//! The widget is opaque: this crate only owns its configuration surface and
//! the inbound event channel. All forwarding is fire-and-forget.

pub mod embed;
pub mod extractor;
pub mod inbound;
pub mod normalizer;

pub use embed::VoiceWidgetConfig;
pub use extractor::TranscriptExtractor;
pub use inbound::{VoiceBridge, VoiceBridgeHandle, VoiceInbound};
pub use normalizer::normalize;
