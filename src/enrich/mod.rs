//! Best-effort reverse geocoding for telemetry events.
//!
//! The geocoder is an unreliable external collaborator: every failure mode
//! (network error, timeout, malformed body, no result) is survivable and
//! only costs the event its `address` field.

pub mod nominatim;

pub use nominatim::NominatimGeocoder;

use anyhow::Result;
use async_trait::async_trait;

/// Resolves coordinates to a human-readable location.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Returns the display name for the coordinates, or `None` when the
    /// service has no answer for them.
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>>;
}
