//! Correlates client-reported telemetry back to its tracking session.

use chrono::Utc;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::enrich::Geocoder;
use crate::models::{Event, TelemetryReport};
use crate::store::{SessionStore, StoreError, StoreResult};

pub struct EventCorrelator {
    store: Arc<dyn SessionStore>,
    geocoder: Arc<dyn Geocoder>,
    enrichment_timeout: Duration,
}

impl EventCorrelator {
    pub fn new(
        store: Arc<dyn SessionStore>,
        geocoder: Arc<dyn Geocoder>,
        enrichment_timeout: Duration,
    ) -> Self {
        Self {
            store,
            geocoder,
            enrichment_timeout,
        }
    }

    /// Validate a telemetry report against a known session, enrich it, and
    /// append it to that session's event log.
    ///
    /// Enrichment only runs when both coordinates are present, and no
    /// enrichment outcome can fail the submission: a timeout, transport
    /// error, or empty answer just leaves the event without an address.
    /// `NotFound` is returned for unknown ids, with no side effects, and
    /// for sessions purged between lookup and append.
    pub async fn submit(
        &self,
        id: &str,
        report: TelemetryReport,
        source_ip: IpAddr,
    ) -> StoreResult<()> {
        if self.store.get(id).await?.is_none() {
            return Err(StoreError::NotFound);
        }

        let mut event = Event::from_report(
            report,
            source_ip.to_string(),
            Utc::now().timestamp_millis(),
        );

        if let (Some(lat), Some(lon)) = (event.latitude, event.longitude) {
            event.address = self.resolve_address(lat, lon).await;
        }

        self.store.append_event(id, event).await
    }

    async fn resolve_address(&self, latitude: f64, longitude: f64) -> Option<String> {
        match tokio::time::timeout(
            self.enrichment_timeout,
            self.geocoder.reverse(latitude, longitude),
        )
        .await
        {
            Ok(Ok(Some(address))) => {
                debug!(%address, "resolved coordinates to address");
                Some(address)
            }
            Ok(Ok(None)) => {
                debug!(latitude, longitude, "geocoder had no answer for coordinates");
                None
            }
            Ok(Err(err)) => {
                warn!(error = %err, "reverse geocoding failed");
                None
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.enrichment_timeout.as_millis() as u64,
                    "reverse geocoding timed out"
                );
                None
            }
        }
    }
}
