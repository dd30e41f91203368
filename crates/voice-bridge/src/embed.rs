//! Embed configuration for the voice widget custom element. The attribute
//! set and asset URLs are the entire contract with the third-party
//! collaborator.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use door_core::config::WidgetCredentials;

/// Script loaded alongside the custom element.
pub const WIDGET_SCRIPT_URL: &str =
    "https://unpkg.com/@vapi-ai/client-sdk-react/dist/embed/widget.umd.js";

/// Stylesheet loaded alongside the custom element.
pub const WIDGET_STYLESHEET_URL: &str =
    "https://unpkg.com/@vapi-ai/client-sdk-react/dist/embed/styles.css";

/// Declarative configuration rendered onto the `<vapi-widget>` element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceWidgetConfig {
    pub public_key: String,
    pub assistant_id: String,
    pub mode: String,
    pub theme: String,
    pub base_bg_color: String,
    pub accent_color: String,
    pub cta_button_color: String,
    pub cta_button_text_color: String,
    pub border_radius: String,
    pub size: String,
    pub position: String,
    pub title: String,
    pub start_button_text: String,
    pub end_button_text: String,
    pub cta_subtitle: String,
    pub chat_first_message: String,
    pub chat_placeholder: String,
    pub voice_show_transcript: bool,
    pub consent_required: bool,
    pub consent_title: String,
    pub consent_content: String,
    pub consent_storage_key: String,
}

impl Default for VoiceWidgetConfig {
    fn default() -> Self {
        Self {
            public_key: String::new(),
            assistant_id: String::new(),
            mode: "voice".into(),
            theme: "dark".into(),
            base_bg_color: "#000000".into(),
            accent_color: "#14B8A6".into(),
            cta_button_color: "#000000".into(),
            cta_button_text_color: "#ffffff".into(),
            border_radius: "large".into(),
            size: "full".into(),
            position: "bottom-right".into(),
            title: "TALK WITH DORA".into(),
            start_button_text: "Start".into(),
            end_button_text: "End Call".into(),
            cta_subtitle: "voice enabled input support".into(),
            chat_first_message: "Hey, How can I help you today?".into(),
            chat_placeholder: "Type your message...".into(),
            voice_show_transcript: true,
            consent_required: true,
            consent_title: "Terms and conditions".into(),
            consent_content: "By clicking Agree, and each time I interact with this AI agent, \
                I consent to the recording, storage, and sharing of my communications with \
                third-party service providers, and as otherwise described in our Terms of Service."
                .into(),
            consent_storage_key: "vapi_widget_consent".into(),
        }
    }
}

impl VoiceWidgetConfig {
    /// Builds the default embed with the deployment's credential pair.
    pub fn from_credentials(credentials: &WidgetCredentials) -> Self {
        Self {
            public_key: credentials.public_key.clone(),
            assistant_id: credentials.assistant_id.clone(),
            ..Self::default()
        }
    }

    /// Validate that the embed carries a usable credential pair.
    pub fn validate(&self) -> Result<()> {
        if self.public_key.is_empty() {
            return Err(anyhow!("widget public_key must not be empty"));
        }
        if self.assistant_id.is_empty() {
            return Err(anyhow!("widget assistant_id must not be empty"));
        }
        Uuid::parse_str(&self.public_key)
            .map_err(|_| anyhow!("widget public_key must be a UUID, got '{}'", self.public_key))?;
        Uuid::parse_str(&self.assistant_id).map_err(|_| {
            anyhow!(
                "widget assistant_id must be a UUID, got '{}'",
                self.assistant_id
            )
        })?;
        Ok(())
    }

    /// Attribute list in the element's kebab-case naming, ready to render
    /// onto the custom element.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        vec![
            ("public-key", self.public_key.clone()),
            ("assistant-id", self.assistant_id.clone()),
            ("mode", self.mode.clone()),
            ("theme", self.theme.clone()),
            ("base-bg-color", self.base_bg_color.clone()),
            ("accent-color", self.accent_color.clone()),
            ("cta-button-color", self.cta_button_color.clone()),
            ("cta-button-text-color", self.cta_button_text_color.clone()),
            ("border-radius", self.border_radius.clone()),
            ("size", self.size.clone()),
            ("position", self.position.clone()),
            ("title", self.title.clone()),
            ("start-button-text", self.start_button_text.clone()),
            ("end-button-text", self.end_button_text.clone()),
            ("cta-subtitle", self.cta_subtitle.clone()),
            ("chat-first-message", self.chat_first_message.clone()),
            ("chat-placeholder", self.chat_placeholder.clone()),
            (
                "voice-show-transcript",
                self.voice_show_transcript.to_string(),
            ),
            ("consent-required", self.consent_required.to_string()),
            ("consent-title", self.consent_title.clone()),
            ("consent-content", self.consent_content.clone()),
            ("consent-storage-key", self.consent_storage_key.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credentials() -> WidgetCredentials {
        WidgetCredentials::default()
    }

    #[test]
    fn test_from_credentials() {
        let config = VoiceWidgetConfig::from_credentials(&test_credentials());
        assert!(config.validate().is_ok());
        assert_eq!(config.title, "TALK WITH DORA");
        assert_eq!(config.mode, "voice");
    }

    #[test]
    fn test_validate_rejects_empty_and_malformed() {
        let config = VoiceWidgetConfig::default();
        assert!(config.validate().is_err());

        let config = VoiceWidgetConfig {
            public_key: "not-a-uuid".into(),
            assistant_id: "also-not-a-uuid".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_attributes_cover_consent_surface() {
        let config = VoiceWidgetConfig::from_credentials(&test_credentials());
        let attributes = config.attributes();

        let get = |name: &str| {
            attributes
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(get("consent-required").as_deref(), Some("true"));
        assert_eq!(
            get("consent-storage-key").as_deref(),
            Some("vapi_widget_consent")
        );
        assert_eq!(get("position").as_deref(), Some("bottom-right"));
        assert!(get("public-key").is_some());
    }
}
