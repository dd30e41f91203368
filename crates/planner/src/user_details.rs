//! User-details capture — the first gated step. Validates the visitor's
//! name and email, forwards them to the automation webhook, and hands the
//! captured identity back so the wizard can advance.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use door_core::event_bus::{make_event, EventSink};
use door_core::notify::{Notification, Notifier};
use door_core::types::{EventType, UserDetails};
use door_outbound::WebhookClient;

/// Local state of the user-details form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDetailsForm {
    pub name: String,
    pub email: String,
    #[serde(skip)]
    submitting: bool,
}

/// A validation failure with the notification copy to surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub title: &'static str,
    pub body: &'static str,
}

impl UserDetailsForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the form: both fields non-empty after trimming, email must
    /// contain `@`. Returns the trimmed identity on success.
    pub fn validate(&self) -> Result<UserDetails, ValidationFailure> {
        let name = self.name.trim();
        let email = self.email.trim();

        if name.is_empty() || email.is_empty() {
            return Err(ValidationFailure {
                title: "Missing Information",
                body: "Please fill in both your name and email address.",
            });
        }
        if !email.contains('@') {
            return Err(ValidationFailure {
                title: "Invalid Email",
                body: "Please enter a valid email address.",
            });
        }

        Ok(UserDetails {
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn begin_submit(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        true
    }

    fn finish_submit(&mut self) {
        self.submitting = false;
    }
}

/// Result of a capture attempt. Notifications have already been surfaced by
/// the time the caller sees this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Webhook accepted the identity; the wizard may advance.
    Accepted(UserDetails),
    /// Validation failed; no network call was made.
    Invalid,
    /// Webhook rejected the call or the transport failed; resubmittable.
    Failed,
    /// A submission is already pending on this form.
    InFlight,
}

/// Runs the capture operation: validate, POST `{name, email}`, notify.
pub struct CaptureService {
    client: Arc<WebhookClient>,
    notifier: Arc<dyn Notifier>,
    event_sink: Arc<dyn EventSink>,
    url: String,
}

impl CaptureService {
    pub fn new(client: Arc<WebhookClient>, notifier: Arc<dyn Notifier>, url: String) -> Self {
        Self {
            client,
            notifier,
            event_sink: door_core::event_bus::noop_sink(),
            url,
        }
    }

    /// Attach an event sink for emitting funnel events.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    pub async fn submit(&self, session_id: &str, form: &mut UserDetailsForm) -> CaptureOutcome {
        if !form.begin_submit() {
            debug!(session_id, "user-details submit ignored, already in flight");
            return CaptureOutcome::InFlight;
        }
        let outcome = self.submit_inner(session_id, form).await;
        form.finish_submit();
        outcome
    }

    async fn submit_inner(&self, session_id: &str, form: &UserDetailsForm) -> CaptureOutcome {
        let details = match form.validate() {
            Ok(details) => details,
            Err(failure) => {
                self.notifier
                    .notify(Notification::destructive(failure.title, failure.body));
                return CaptureOutcome::Invalid;
            }
        };

        let payload = serde_json::json!({
            "name": details.name,
            "email": details.email,
        });

        match self.client.dispatch(&self.url, payload).await {
            Ok(delivery) if delivery.success => {
                self.notifier.notify(Notification::success(
                    "Welcome aboard!",
                    format!("Hi {}, let's plan your perfect trip!", details.name),
                ));
                self.event_sink.emit(make_event(
                    EventType::WebhookDelivered,
                    session_id,
                    Some(details.email.clone()),
                    Some("user_details".into()),
                ));
                CaptureOutcome::Accepted(details)
            }
            Ok(_) | Err(_) => {
                self.notifier.notify(Notification::destructive(
                    "Error",
                    "Something went wrong. Please try again.",
                ));
                self.event_sink.emit(make_event(
                    EventType::WebhookFailed,
                    session_id,
                    Some(details.email.clone()),
                    Some("user_details".into()),
                ));
                CaptureOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use door_core::notify::{capture_notifier, Severity};
    use door_outbound::CaptureTransport;

    fn service_with(
        transport: Arc<CaptureTransport>,
        notifier: Arc<door_core::notify::CaptureNotifier>,
    ) -> CaptureService {
        let client = Arc::new(WebhookClient::new(transport));
        CaptureService::new(
            client,
            notifier as Arc<dyn Notifier>,
            "https://hooks.example.com/user-details".into(),
        )
    }

    #[test]
    fn test_validate_trims_and_accepts() {
        let form = UserDetailsForm {
            name: "  Asha  ".into(),
            email: " asha@example.com ".into(),
            ..Default::default()
        };
        let details = form.validate().unwrap();
        assert_eq!(details.name, "Asha");
        assert_eq!(details.email, "asha@example.com");
    }

    #[test]
    fn test_validate_rejects_blank() {
        let form = UserDetailsForm {
            name: "   ".into(),
            email: "asha@example.com".into(),
            ..Default::default()
        };
        assert_eq!(form.validate().unwrap_err().title, "Missing Information");
    }

    #[tokio::test]
    async fn test_invalid_email_blocks_network_call() {
        let transport = Arc::new(CaptureTransport::new());
        let notifier = capture_notifier();
        let service = service_with(transport.clone(), notifier.clone());

        let mut form = UserDetailsForm {
            name: "Asha".into(),
            email: "not-an-email".into(),
            ..Default::default()
        };

        let outcome = service.submit("sess-1", &mut form).await;
        assert_eq!(outcome, CaptureOutcome::Invalid);
        assert_eq!(transport.count(), 0);

        let notification = notifier.last().unwrap();
        assert_eq!(notification.title, "Invalid Email");
        assert_eq!(notification.severity, Severity::Destructive);
    }

    #[tokio::test]
    async fn test_valid_submit_posts_and_welcomes() {
        let transport = Arc::new(CaptureTransport::new());
        let notifier = capture_notifier();
        let service = service_with(transport.clone(), notifier.clone());

        let mut form = UserDetailsForm {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            ..Default::default()
        };

        let outcome = service.submit("sess-1", &mut form).await;
        match outcome {
            CaptureOutcome::Accepted(details) => assert_eq!(details.name, "Asha"),
            other => panic!("Expected Accepted, got {:?}", other),
        }

        assert_eq!(transport.count(), 1);
        let (_, payload) = &transport.calls()[0];
        assert_eq!(payload["name"], "Asha");
        assert_eq!(payload["email"], "asha@example.com");

        let notification = notifier.last().unwrap();
        assert_eq!(notification.severity, Severity::Success);
        assert!(notification.body.contains("Asha"));
    }

    #[tokio::test]
    async fn test_webhook_failure_keeps_form_resubmittable() {
        let transport = Arc::new(CaptureTransport::with_status(502));
        let notifier = capture_notifier();
        let service = service_with(transport.clone(), notifier.clone());

        let mut form = UserDetailsForm {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            ..Default::default()
        };

        let outcome = service.submit("sess-1", &mut form).await;
        assert_eq!(outcome, CaptureOutcome::Failed);
        assert!(!form.is_submitting());

        // Resubmission is a brand-new independent call.
        transport.set_status(200);
        let outcome = service.submit("sess-1", &mut form).await;
        assert!(matches!(outcome, CaptureOutcome::Accepted(_)));
        assert_eq!(transport.count(), 2);
    }
}
