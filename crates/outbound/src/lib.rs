//! Outbound HTTP — webhook delivery to the workflow-automation endpoint and
//! the reverse-geocoding lookup used for origin-city auto-fill.

pub mod geocode;
pub mod webhook;

pub use geocode::ReverseGeocoder;
pub use webhook::{CaptureTransport, HttpTransport, WebhookClient, WebhookTransport};
