use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use lifeline_types::models::Point;

/// Fallback used wherever a coordinate cannot be resolved to an address.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoder request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoder returned no address")]
    NoAddress,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

/// Reverse-geocoding client for a Nominatim-compatible endpoint. Lookups are
/// best-effort: callers substitute [`UNKNOWN_LOCATION`] on any error.
#[derive(Clone)]
pub struct Geocoder {
    http: reqwest::Client,
    base_url: String,
}

impl Geocoder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("lifeline-safety-app")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Coordinate -> human-readable address. The bounded timeout keeps a slow
    /// provider from stalling an SOS response.
    pub async fn reverse(&self, point: Point) -> Result<String, GeocodeError> {
        let url = format!("{}/reverse", self.base_url.trim_end_matches('/'));
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("format", "jsonv2"),
                ("lat", &point.latitude.to_string()),
                ("lon", &point.longitude.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: ReverseResponse = resp.json().await?;
        match body.display_name {
            Some(name) if !name.is_empty() => {
                debug!("Resolved {} to {}", point, name);
                Ok(name)
            }
            _ => Err(GeocodeError::NoAddress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_provider_is_an_error_not_a_hang() {
        // Nothing listens on this port; the lookup must fail fast so the SOS
        // workflow can fall back to the sentinel.
        let geocoder = Geocoder::new("http://127.0.0.1:9");
        let result = geocoder.reverse(Point::new(0.0, 0.0)).await;
        assert!(result.is_err());
    }
}
