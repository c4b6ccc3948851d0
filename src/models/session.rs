use serde::{Deserialize, Serialize};

/// One tracking link's accumulated state: the redirect target plus every
/// telemetry report correlated back to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub target_url: String,
    /// Unix epoch milliseconds; drives expiry.
    pub created_at: i64,
    /// Append-only, in arrival order.
    pub events: Vec<Event>,
}

/// A single telemetry report tied to a session.
///
/// Serialized field names follow the JSON wire contract (`userAgent`,
/// `screenWidth`, ...). Optional fields are omitted entirely when absent so
/// an unenriched event carries no `address` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub user_agent: Option<String>,
    pub screen_width: Option<u32>,
    pub screen_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Timestamp as reported by the client, kept opaque.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_timestamp: Option<String>,
    /// Source network address observed by the server.
    pub ip: String,
    /// Server-assigned receipt time, epoch milliseconds.
    pub timestamp: i64,
    /// Resolved postal address, filled by enrichment when coordinates were
    /// present and the geocoder answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Event {
    /// Build an event from a raw client report plus the server-side facts
    /// (observed source address, receipt time). Enrichment fills `address`
    /// later, before the event is appended.
    pub fn from_report(report: TelemetryReport, ip: String, timestamp: i64) -> Self {
        Self {
            user_agent: report.user_agent,
            screen_width: report.screen_width,
            screen_height: report.screen_height,
            battery_level: report.battery_level,
            latitude: report.latitude,
            longitude: report.longitude,
            client_timestamp: report.timestamp,
            ip,
            timestamp,
            address: None,
        }
    }
}

/// Device/location payload posted by the landing page. Every field is
/// optional: browsers deny permissions, lack APIs, or send nulls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TelemetryReport {
    pub user_agent: Option<String>,
    pub screen_width: Option<u32>,
    pub screen_height: Option<u32>,
    pub battery_level: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub target_url: String,
}

#[derive(Debug, Deserialize)]
pub struct LocationReport {
    #[serde(rename = "pageID")]
    pub page_id: String,
    #[serde(rename = "deviceInfo")]
    pub device_info: TelemetryReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_with_wire_field_names() {
        let event = Event {
            user_agent: Some("Mozilla/5.0".to_string()),
            screen_width: Some(1920),
            screen_height: Some(1080),
            battery_level: Some(87.0),
            latitude: Some(10.0),
            longitude: Some(20.0),
            client_timestamp: Some("2026-01-01T00:00:00Z".to_string()),
            ip: "203.0.113.9".to_string(),
            timestamp: 1_700_000_000_000,
            address: Some("Somewhere".to_string()),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["userAgent"], "Mozilla/5.0");
        assert_eq!(value["screenWidth"], 1920);
        assert_eq!(value["batteryLevel"], 87.0);
        assert_eq!(value["ip"], "203.0.113.9");
        assert_eq!(value["address"], "Somewhere");
    }

    #[test]
    fn unenriched_event_omits_absent_fields() {
        let event = Event::from_report(
            TelemetryReport::default(),
            "198.51.100.7".to_string(),
            1_700_000_000_000,
        );

        let value = serde_json::to_value(&event).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("address"));
        assert!(!object.contains_key("latitude"));
        assert!(!object.contains_key("batteryLevel"));
        assert_eq!(value["ip"], "198.51.100.7");
    }

    #[test]
    fn location_report_deserializes_original_payload() {
        let body = serde_json::json!({
            "pageID": "abc-123",
            "deviceInfo": {
                "userAgent": "test-agent",
                "screenWidth": 800,
                "screenHeight": 600,
                "batteryLevel": null,
                "latitude": 51.5,
                "longitude": -0.1,
                "timestamp": "2026-01-01T00:00:00Z"
            }
        });

        let report: LocationReport = serde_json::from_value(body).unwrap();
        assert_eq!(report.page_id, "abc-123");
        assert_eq!(report.device_info.latitude, Some(51.5));
        assert_eq!(report.device_info.battery_level, None);
    }
}
