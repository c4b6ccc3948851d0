use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub tracking: TrackingConfig,
    pub geocoder: GeocoderConfig,
    pub frontend: FrontendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// How long session data is kept before the sweeper evicts it.
    pub retention_secs: u64,
    /// How often the sweeper runs. Configurable independently of the
    /// retention window; both default to 24 hours.
    pub sweep_interval_secs: u64,
    /// Base for generated tracking URLs. When unset, the request's Host
    /// header is used.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    pub base_url: String,
    /// Identifying header required by the Nominatim usage policy.
    pub user_agent: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Path to a directory of static frontend files.
    /// If None, uses the embedded frontend.
    pub static_dir: Option<String>,
}

impl TrackingConfig {
    const fn default_retention_secs() -> u64 {
        24 * 60 * 60
    }

    const fn default_sweep_interval_secs() -> u64 {
        24 * 60 * 60
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl GeocoderConfig {
    const fn default_timeout_ms() -> u64 {
        3000
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let retention_secs =
            env_u64("RETENTION_SECS", TrackingConfig::default_retention_secs())?;
        let sweep_interval_secs =
            env_u64("SWEEP_INTERVAL_SECS", TrackingConfig::default_sweep_interval_secs())?;
        let public_base_url = std::env::var("PUBLIC_BASE_URL").ok();

        let geocoder_base_url = std::env::var("GEOCODER_BASE_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string());
        let geocoder_user_agent = std::env::var("GEOCODER_USER_AGENT").unwrap_or_else(|_| {
            format!(
                "linktrace/{} (set GEOCODER_USER_AGENT to your contact)",
                env!("CARGO_PKG_VERSION")
            )
        });
        let geocoder_timeout_ms =
            env_u64("GEOCODER_TIMEOUT_MS", GeocoderConfig::default_timeout_ms())?;

        let static_dir = std::env::var("STATIC_DIR").ok();

        Ok(Config {
            server: ServerConfig { host, port },
            tracking: TrackingConfig {
                retention_secs,
                sweep_interval_secs,
                public_base_url,
            },
            geocoder: GeocoderConfig {
                base_url: geocoder_base_url,
                user_agent: geocoder_user_agent,
                timeout_ms: geocoder_timeout_ms,
            },
            frontend: FrontendConfig { static_dir },
        })
    }
}

fn env_u64(name: &str, default: u64) -> anyhow::Result<u64> {
    match std::env::var(name) {
        Ok(value) => value
            .parse::<u64>()
            .with_context(|| format!("{name} must be an integer")),
        Err(_) => Ok(default),
    }
}
