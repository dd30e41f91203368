//! Webhook delivery — outbound JSON POSTs to the workflow-automation
//! endpoint. Every call is independent and fire-and-forget: the response
//! body is ignored, only the HTTP status is interpreted, and nothing is
//! retried automatically.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use door_core::{DoorError, DoorResult};

/// Transport seam for issuing the actual POST. Production uses reqwest;
/// tests capture calls without touching the network.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// POST `payload` as JSON to `url` and return the response status code.
    async fn post_json(&self, url: &str, payload: &serde_json::Value) -> DoorResult<u16>;
}

/// Production transport over a shared reqwest client.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout_ms: u64) -> DoorResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl WebhookTransport for HttpTransport {
    async fn post_json(&self, url: &str, payload: &serde_json::Value) -> DoorResult<u16> {
        let response = self.http.post(url).json(payload).send().await?;
        Ok(response.status().as_u16())
    }
}

/// Test transport that records every call and answers with a fixed status.
#[derive(Default)]
pub struct CaptureTransport {
    status: Mutex<u16>,
    calls: Mutex<Vec<(String, serde_json::Value)>>,
}

impl CaptureTransport {
    pub fn new() -> Self {
        Self {
            status: Mutex::new(200),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_status(status: u16) -> Self {
        Self {
            status: Mutex::new(status),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_status(&self, status: u16) {
        *self.status.lock().expect("transport mutex poisoned") = status;
    }

    pub fn calls(&self) -> Vec<(String, serde_json::Value)> {
        self.calls.lock().expect("transport mutex poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().expect("transport mutex poisoned").len()
    }
}

#[async_trait]
impl WebhookTransport for CaptureTransport {
    async fn post_json(&self, url: &str, payload: &serde_json::Value) -> DoorResult<u16> {
        self.calls
            .lock()
            .expect("transport mutex poisoned")
            .push((url.to_string(), payload.clone()));
        Ok(*self.status.lock().expect("transport mutex poisoned"))
    }
}

/// Record of one outbound POST.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookDelivery {
    pub id: Uuid,
    pub url: String,
    pub payload: serde_json::Value,
    pub response_status: Option<u16>,
    pub success: bool,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}

/// Issues webhook POSTs through a transport and keeps per-process delivery
/// records for inspection.
pub struct WebhookClient {
    transport: std::sync::Arc<dyn WebhookTransport>,
    deliveries: DashMap<Uuid, WebhookDelivery>,
}

impl WebhookClient {
    pub fn new(transport: std::sync::Arc<dyn WebhookTransport>) -> Self {
        Self {
            transport,
            deliveries: DashMap::new(),
        }
    }

    /// POSTs `payload` to `url`. A completed HTTP exchange returns the
    /// delivery record with its success flag set from the status class; a
    /// transport failure is an error after the failed delivery is recorded.
    pub async fn dispatch(
        &self,
        url: &str,
        payload: serde_json::Value,
    ) -> DoorResult<WebhookDelivery> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        match self.transport.post_json(url, &payload).await {
            Ok(status) => {
                let success = (200..300).contains(&status);
                let delivery = WebhookDelivery {
                    id,
                    url: url.to_string(),
                    payload,
                    response_status: Some(status),
                    success,
                    created_at,
                    delivered_at: Some(Utc::now()),
                };
                if success {
                    info!(delivery_id = %id, url, status, "webhook delivered");
                } else {
                    warn!(delivery_id = %id, url, status, "webhook rejected");
                }
                self.deliveries.insert(id, delivery.clone());
                Ok(delivery)
            }
            Err(e) => {
                warn!(delivery_id = %id, url, error = %e, "webhook transport failed");
                self.deliveries.insert(
                    id,
                    WebhookDelivery {
                        id,
                        url: url.to_string(),
                        payload,
                        response_status: None,
                        success: false,
                        created_at,
                        delivered_at: None,
                    },
                );
                Err(DoorError::Webhook(format!("delivery to {url} failed: {e}")))
            }
        }
    }

    pub fn deliveries(&self) -> Vec<WebhookDelivery> {
        self.deliveries.iter().map(|d| d.value().clone()).collect()
    }

    pub fn delivery_count(&self) -> usize {
        self.deliveries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_dispatch_success() {
        let transport = Arc::new(CaptureTransport::new());
        let client = WebhookClient::new(transport.clone());

        let delivery = client
            .dispatch("https://hooks.example.com/a", serde_json::json!({"name": "Asha"}))
            .await
            .unwrap();

        assert!(delivery.success);
        assert_eq!(delivery.response_status, Some(200));
        assert_eq!(transport.count(), 1);
        let (url, payload) = &transport.calls()[0];
        assert_eq!(url, "https://hooks.example.com/a");
        assert_eq!(payload["name"], "Asha");
        assert_eq!(client.delivery_count(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_non_2xx_is_recorded_unsuccessful() {
        let transport = Arc::new(CaptureTransport::with_status(500));
        let client = WebhookClient::new(transport);

        let delivery = client
            .dispatch("https://hooks.example.com/a", serde_json::json!({}))
            .await
            .unwrap();

        assert!(!delivery.success);
        assert_eq!(delivery.response_status, Some(500));
    }

    #[tokio::test]
    async fn test_every_dispatch_is_independent() {
        // Resubmission is a brand-new call: no idempotency key, two records.
        let transport = Arc::new(CaptureTransport::new());
        let client = WebhookClient::new(transport.clone());

        let payload = serde_json::json!({"email": "asha@example.com"});
        client
            .dispatch("https://hooks.example.com/a", payload.clone())
            .await
            .unwrap();
        client
            .dispatch("https://hooks.example.com/a", payload)
            .await
            .unwrap();

        assert_eq!(transport.count(), 2);
        assert_eq!(client.delivery_count(), 2);
    }
}
