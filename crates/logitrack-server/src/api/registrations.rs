//! Registration intake and listing handlers.
//!
//! This server stands in for the sheet endpoint, so the bodies follow the
//! same flat contract: `{success, message, row}` on acceptance,
//! `{success, error}` on refusal, `{success, data, count}` for listings.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use logitrack_core::{
    is_valid_package_code, is_valid_phone, normalize_phone, Coordinate, RegistrationRecord,
    StorageSource,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{AppState, Refusal};

/// Incoming registration, in the camelCase shape clients send.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NewRegistration {
    package_code: String,
    phone: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    is_pickup: bool,
    /// Client-side creation time; the server stamps its own when absent.
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(super) struct Accepted {
    success: bool,
    message: &'static str,
    /// Total stored registrations after the write, mirroring the row number
    /// a sheet backend reports.
    row: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct Listing {
    success: bool,
    data: Vec<RegistrationRecord>,
    count: usize,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListQuery {
    limit: Option<usize>,
}

pub(super) async fn create_registration(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<NewRegistration>,
) -> Response {
    if let Err(reason) = validate_payload(&body) {
        tracing::warn!(request_id = %req_id.0, reason, "refused registration payload");
        return (StatusCode::BAD_REQUEST, Json(Refusal::new(reason))).into_response();
    }

    let record = RegistrationRecord {
        id: Utc::now().timestamp_millis(),
        package_code: body.package_code.trim().to_string(),
        phone: normalize_phone(&body.phone),
        latitude: body.latitude,
        longitude: body.longitude,
        is_pickup: body.is_pickup,
        timestamp: body.timestamp.unwrap_or_else(Utc::now),
        source: StorageSource::Remote,
    };

    let log = state.log.lock().await;
    match log.append(record) {
        Ok(row) => {
            tracing::info!(request_id = %req_id.0, row, "registration accepted");
            (
                StatusCode::OK,
                Json(Accepted {
                    success: true,
                    message: "registration saved",
                    row,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %req_id.0, error = %e, "failed to persist registration");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Refusal::new("could not persist the registration")),
            )
                .into_response()
        }
    }
}

pub(super) async fn list_registrations(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Response {
    match state.log.lock().await.read() {
        Ok(mut records) => {
            if let Some(limit) = query.limit {
                records.truncate(limit);
            }
            let count = records.len();
            (
                StatusCode::OK,
                Json(Listing {
                    success: true,
                    data: records,
                    count,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to read the registration log");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Refusal::new("could not read the registration log")),
            )
                .into_response()
        }
    }
}

fn validate_payload(body: &NewRegistration) -> Result<(), String> {
    if !is_valid_package_code(body.package_code.trim()) {
        return Err("package code must start with 6 and contain exactly 13 digits".to_string());
    }
    if !is_valid_phone(&body.phone) {
        return Err("phone must contain exactly 9 digits".to_string());
    }
    if let Err(e) = Coordinate::new(body.latitude, body.longitude) {
        return Err(e.to_string());
    }
    Ok(())
}
