use thiserror::Error;

pub type DoorResult<T> = Result<T, DoorError>;

#[derive(Error, Debug)]
pub enum DoorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Webhook delivery error: {0}")]
    Webhook(String),

    #[error("Geocoding error: {0}")]
    Geocode(String),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
