use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::enrich::Geocoder;

/// Client for a Nominatim-compatible `/reverse` endpoint.
///
/// Nominatim's usage policy requires an identifying User-Agent, so the
/// header is set on every request via the client builder.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("failed to build geocoder HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>> {
        let response = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await
            .context("reverse geocoding request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("reverse geocoding returned status {status}");
        }

        let body: ReverseResponse = response
            .json()
            .await
            .context("malformed reverse geocoding response")?;

        Ok(body.display_name)
    }
}
