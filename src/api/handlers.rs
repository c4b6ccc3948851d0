use axum::{
    extract::{ConnectInfo, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::api::client_ip::extract_client_ip;
use crate::correlator::EventCorrelator;
use crate::models::{Event, GenerateRequest, LocationReport};
use crate::store::{SessionStore, StoreError};

pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub correlator: Arc<EventCorrelator>,
    /// Base for generated tracking URLs; falls back to the request Host.
    pub public_base_url: Option<String>,
    pub started_at: Instant,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    #[serde(rename = "trackingUrl")]
    pub tracking_url: String,
}

#[derive(Serialize)]
pub struct LocationResponse {
    pub success: bool,
}

#[derive(Serialize)]
pub struct ClicksResponse {
    pub clicks: Vec<Event>,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(rename = "activeTracking")]
    pub active_tracking: usize,
    pub uptime: f64,
}

/// Create a tracking link for a target URL
pub async fn generate_link(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, (StatusCode, Json<ErrorResponse>)> {
    if payload.target_url.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "target_url cannot be empty".to_string(),
            }),
        ));
    }

    let session = state.store.create(&payload.target_url).await;
    debug!(tracking_id = %session.id, target_url = %session.target_url, "created tracking session");

    let base = match &state.public_base_url {
        Some(base) => base.trim_end_matches('/').to_string(),
        None => {
            let host = headers
                .get(header::HOST)
                .and_then(|h| h.to_str().ok())
                .unwrap_or("localhost");
            format!("http://{host}")
        }
    };

    Ok(Json(GenerateResponse {
        tracking_url: format!("{base}/track/{}", session.id),
    }))
}

/// Accept a telemetry report from the landing page
///
/// Responds 200 `{"success": true}` regardless of whether the id matched a
/// live session, so probing this endpoint reveals nothing about which ids
/// exist.
pub async fn report_location(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<LocationReport>,
) -> Json<LocationResponse> {
    let source_ip = extract_client_ip(&headers, addr.ip());

    match state
        .correlator
        .submit(&payload.page_id, payload.device_info, source_ip)
        .await
    {
        Ok(()) => debug!(tracking_id = %payload.page_id, "recorded telemetry event"),
        Err(StoreError::NotFound) => {
            debug!(tracking_id = %payload.page_id, "dropped telemetry for unknown tracking id")
        }
        Err(err) => warn!(error = %err, "failed to record telemetry event"),
    }

    Json(LocationResponse { success: true })
}

/// Get recorded events for a tracking id
pub async fn get_tracking(
    State(state): State<Arc<AppState>>,
    Path(page_id): Path<String>,
) -> Result<Json<ClicksResponse>, (StatusCode, Json<MessageResponse>)> {
    match state.store.get(&page_id).await {
        Ok(Some(session)) => Ok(Json(ClicksResponse {
            clicks: session.events,
        })),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(MessageResponse {
                message: "Tracking data not found or expired".to_string(),
            }),
        )),
        Err(err) => {
            warn!(error = %err, "failed to look up tracking data");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse {
                    message: "Internal server error".to_string(),
                }),
            ))
        }
    }
}

/// Get the raw event array for a tracking id
pub async fn stats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match state.store.get(&id).await {
        Ok(Some(session)) => Json(session.events).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Invalid tracking ID or data expired").into_response(),
        Err(err) => {
            warn!(error = %err, "failed to look up tracking stats");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

/// Delete a tracking session
pub async fn delete_tracking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<MessageResponse>)> {
    match state.store.delete(&id).await {
        Ok(true) => Ok(Json(MessageResponse {
            message: "Tracking data deleted successfully".to_string(),
        })),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(MessageResponse {
                message: "Tracking ID not found".to_string(),
            }),
        )),
        Err(err) => {
            warn!(error = %err, "failed to delete tracking data");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse {
                    message: "Internal server error".to_string(),
                }),
            ))
        }
    }
}

/// Server status and active session count
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running".to_string(),
        active_tracking: state.store.len().await,
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}
