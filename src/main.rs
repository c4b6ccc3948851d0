use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use linktrace::api::{self, AppState};
use linktrace::config::Config;
use linktrace::correlator::EventCorrelator;
use linktrace::enrich::NominatimGeocoder;
use linktrace::store::{MemorySessionStore, SessionStore};
use linktrace::sweeper::Sweeper;
use linktrace::track;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    info!("Using in-memory session store - data will be lost on restart");

    let geocoder = Arc::new(NominatimGeocoder::new(
        &config.geocoder.base_url,
        &config.geocoder.user_agent,
        config.geocoder.timeout(),
    )?);
    let correlator = Arc::new(EventCorrelator::new(
        Arc::clone(&store),
        geocoder,
        config.geocoder.timeout(),
    ));

    let sweeper = Sweeper::spawn(
        Arc::clone(&store),
        config.tracking.sweep_interval(),
        config.tracking.retention(),
    );
    info!(
        period_secs = config.tracking.sweep_interval_secs,
        retention_secs = config.tracking.retention_secs,
        "Expiry sweeper started"
    );

    let state = Arc::new(AppState {
        store: Arc::clone(&store),
        correlator,
        public_base_url: config.tracking.public_base_url.clone(),
        started_at: Instant::now(),
    });

    let app = api::create_api_router(Arc::clone(&state), config.frontend.static_dir.clone())
        .merge(track::create_track_router(state));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    sweeper.shutdown();
    sweeper.join().await;

    Ok(())
}
