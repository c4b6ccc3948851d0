use axum::{
    http::Uri,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use super::handlers::{
    delete_tracking, generate_link, get_tracking, report_location, stats, status, AppState,
};
use super::static_files::serve_static;

pub fn create_api_router(state: Arc<AppState>, static_dir: Option<String>) -> Router {
    Router::new()
        .route("/generate", post(generate_link))
        .route("/location", post(report_location))
        .route("/get-tracking/{page_id}", get(get_tracking))
        .route("/stats/{id}", get(stats))
        .route("/delete/{id}", delete(delete_tracking))
        .route("/status", get(status))
        .layer(CorsLayer::permissive())
        .fallback(move |uri: Uri| {
            let static_dir = static_dir.clone();
            async move { serve_static(uri, static_dir).await }
        })
        .with_state(state)
}
