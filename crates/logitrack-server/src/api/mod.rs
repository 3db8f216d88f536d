mod registrations;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use logitrack_store::RegistrationLog;

use crate::middleware::request_id;

#[derive(Clone)]
pub struct AppState {
    pub log: Arc<Mutex<RegistrationLog>>,
}

/// Refusal envelope of the shared channel contract: flat `success`/`error`,
/// so clients treat this server exactly like the sheet endpoint.
#[derive(Debug, Serialize)]
pub struct Refusal {
    pub success: bool,
    pub error: String,
}

impl Refusal {
    pub(super) fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    timestamp: DateTime<Utc>,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/registrations",
            get(registrations::list_registrations).post(registrations::create_registration),
        )
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let readable = state.log.lock().await.read().is_ok();
    let (status, label) = if readable {
        (StatusCode::OK, "ok")
    } else {
        tracing::warn!("health check: registration log unreadable");
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(HealthBody {
            status: label,
            timestamp: Utc::now(),
        }),
    )
}
