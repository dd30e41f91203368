//! Notification surface — the transient messages shown to the user after
//! validation failures and submission outcomes.
//!
//! Every failure in this system degrades to "the user sees a message and can
//! try again", so the notifier is the single user-facing error channel.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Destructive,
}

/// A transient user-facing message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity: Severity::Info,
        }
    }

    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity: Severity::Success,
        }
    }

    pub fn destructive(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity: Severity::Destructive,
        }
    }
}

/// Trait for surfacing notifications to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// No-op notifier for paths with no user-facing surface.
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn notify(&self, _notification: Notification) {}
}

/// In-memory notifier that captures notifications for testing.
#[derive(Default)]
pub struct CaptureNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl CaptureNotifier {
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .expect("notifier mutex poisoned")
            .clone()
    }

    pub fn count(&self) -> usize {
        self.notifications
            .lock()
            .expect("notifier mutex poisoned")
            .len()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications
            .lock()
            .expect("notifier mutex poisoned")
            .last()
            .cloned()
    }
}

impl Notifier for CaptureNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
    }
}

/// Notifier that writes each message to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Destructive => tracing::warn!(
                title = %notification.title,
                body = %notification.body,
                "notification"
            ),
            _ => tracing::info!(
                title = %notification.title,
                body = %notification.body,
                "notification"
            ),
        }
    }
}

/// Convenience: create a no-op notifier.
pub fn noop_notifier() -> Arc<dyn Notifier> {
    Arc::new(NoOpNotifier)
}

/// Convenience: create a capture notifier for tests.
pub fn capture_notifier() -> Arc<CaptureNotifier> {
    Arc::new(CaptureNotifier::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_notifier() {
        let notifier = capture_notifier();
        assert_eq!(notifier.count(), 0);

        notifier.notify(Notification::destructive(
            "Missing Information",
            "Please fill in both your name and email address.",
        ));
        notifier.notify(Notification::success("Welcome aboard!", "Hi Asha"));

        assert_eq!(notifier.count(), 2);
        let last = notifier.last().unwrap();
        assert_eq!(last.severity, Severity::Success);
        assert_eq!(last.title, "Welcome aboard!");
    }
}
