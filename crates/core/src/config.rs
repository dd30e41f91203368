use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `ANYWHERE_DOOR__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub geocode: GeocodeConfig,
    #[serde(default)]
    pub widget: WidgetCredentials,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

/// Outbound webhook endpoints. The user-details and voice URLs are fixed by
/// the automation workflow; the trip-planner URL is deployment-supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    #[serde(default = "default_webhook_url")]
    pub user_details_url: String,
    #[serde(default = "default_webhook_url")]
    pub trip_planner_url: String,
    #[serde(default = "default_webhook_url")]
    pub voice_url: String,
    #[serde(default = "default_webhook_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeConfig {
    #[serde(default = "default_geocode_enabled")]
    pub enabled: bool,
    #[serde(default = "default_geocode_base_url")]
    pub base_url: String,
    #[serde(default = "default_locality_language")]
    pub locality_language: String,
}

/// Credential pair for the embedded voice widget, supplied at deploy time.
#[derive(Debug, Clone, Deserialize)]
pub struct WidgetCredentials {
    #[serde(default = "default_widget_public_key")]
    pub public_key: String,
    #[serde(default = "default_widget_assistant_id")]
    pub assistant_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

// Default functions
fn default_node_id() -> String {
    "door-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_webhook_url() -> String {
    "https://thenameismonisha.app.n8n.cloud/webhook/190ece94-13f5-4a98-a50a-c97ccd4459da"
        .to_string()
}
fn default_webhook_timeout_ms() -> u64 {
    10_000
}
fn default_geocode_enabled() -> bool {
    true
}
fn default_geocode_base_url() -> String {
    "https://api.bigdatacloud.net/data/reverse-geocode-client".to_string()
}
fn default_locality_language() -> String {
    "en".to_string()
}
fn default_widget_public_key() -> String {
    "a93b060a-e811-4d43-8ca2-23ad3a3d9e68".to_string()
}
fn default_widget_assistant_id() -> String {
    "f3e5e8d1-dc15-497f-b187-904279398508".to_string()
}
fn default_metrics_port() -> u16 {
    9091
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            user_details_url: default_webhook_url(),
            trip_planner_url: default_webhook_url(),
            voice_url: default_webhook_url(),
            timeout_ms: default_webhook_timeout_ms(),
        }
    }
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            enabled: default_geocode_enabled(),
            base_url: default_geocode_base_url(),
            locality_language: default_locality_language(),
        }
    }
}

impl Default for WidgetCredentials {
    fn default() -> Self {
        Self {
            public_key: default_widget_public_key(),
            assistant_id: default_widget_assistant_id(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            webhook: WebhookConfig::default(),
            geocode: GeocodeConfig::default(),
            widget: WidgetCredentials::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("ANYWHERE_DOOR")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.http_port, 8080);
        assert!(config.webhook.user_details_url.starts_with("https://"));
        assert_eq!(config.geocode.locality_language, "en");
        assert!(config.geocode.enabled);
        assert!(!config.widget.public_key.is_empty());
    }
}
