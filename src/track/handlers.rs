use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

use super::dispatcher;
use crate::api::AppState;

/// Landing page skeleton; id and target are injected as JSON string
/// literals so arbitrary URLs cannot break out of the script context.
const LANDING_PAGE: &str = include_str!("landing.html");

/// Serve the telemetry-collecting landing page for a tracking id
///
/// The page posts the visitor's device and location data back to
/// `/location`, then forwards the browser to the resolved target URL.
pub async fn track_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match dispatcher::resolve(state.store.as_ref(), &id).await {
        Ok(Some(target_url)) => Html(render_landing_page(&id, &target_url)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            "Invalid tracking URL or link has expired",
        )
            .into_response(),
        Err(err) => {
            warn!(error = %err, "failed to resolve tracking id");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

fn render_landing_page(id: &str, target_url: &str) -> String {
    LANDING_PAGE
        .replace("__PAGE_ID__", &json_literal(id))
        .replace("__TARGET_URL__", &json_literal(target_url))
}

fn json_literal(value: &str) -> String {
    let literal = serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string());
    // A verbatim `</script>` inside the literal would end the script element.
    literal.replace('<', "\\u003c")
}
