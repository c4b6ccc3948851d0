use axum::{routing::get, Router};
use std::sync::Arc;

use super::handlers::track_page;
use crate::api::AppState;

pub fn create_track_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/track/{id}", get(track_page))
        .with_state(state)
}
