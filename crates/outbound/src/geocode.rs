//! Reverse geocoding — turns browser-granted coordinates into an origin
//! city for the planner's auto-fill. Failures here are never surfaced to the
//! user; the field is simply left blank.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use door_core::config::GeocodeConfig;
use door_core::{DoorError, DoorResult};

/// Relevant subset of the reverse-geocode response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ReverseGeocodeResponse {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
}

/// Picks the display city: `city`, else `locality`, else the literal
/// "Unknown" when the service answered but named nothing.
pub fn resolve_city(response: &ReverseGeocodeResponse) -> String {
    response
        .city
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .or_else(|| {
            response
                .locality
                .as_deref()
                .filter(|l| !l.trim().is_empty())
        })
        .unwrap_or("Unknown")
        .to_string()
}

/// Client for the third-party reverse-geocoding API.
pub struct ReverseGeocoder {
    http: reqwest::Client,
    config: GeocodeConfig,
}

impl ReverseGeocoder {
    pub fn new(config: GeocodeConfig) -> DoorResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { http, config })
    }

    /// GET the city/locality for the given coordinates.
    pub async fn city_for(&self, latitude: f64, longitude: f64) -> DoorResult<String> {
        let url = Url::parse_with_params(
            &self.config.base_url,
            &[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("localityLanguage", self.config.locality_language.clone()),
            ],
        )
        .map_err(|e| DoorError::Geocode(format!("bad geocode url: {e}")))?;

        let response = self.http.get(url).send().await?.error_for_status()?;
        let body: ReverseGeocodeResponse = response.json().await?;
        let city = resolve_city(&body);
        debug!(latitude, longitude, city = %city, "reverse geocode resolved");
        Ok(city)
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }
}
