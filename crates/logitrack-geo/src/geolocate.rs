//! HTTP positioning provider speaking the MLS geolocate protocol.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::provider::{PositionError, PositionOptions, PositionProvider, RawPosition};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct GeolocateResponse {
    location: GeolocatePoint,
    accuracy: f64,
}

#[derive(Debug, Deserialize)]
struct GeolocatePoint {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Clone, Copy)]
struct CachedFix {
    position: RawPosition,
    taken_at: Instant,
}

/// Positioning provider backed by an MLS-compatible geolocate endpoint.
///
/// High-accuracy requests forbid coarse IP positioning (`considerIp: false`);
/// low-accuracy requests allow it. The last successful fix is kept and served
/// again while it is younger than the request's `max_age`.
pub struct GeolocateClient {
    client: Client,
    url: String,
    last_fix: Mutex<Option<CachedFix>>,
}

impl GeolocateClient {
    /// Builds a provider pointed at `url`.
    ///
    /// The attempt timeout is applied per request, not here, because the two
    /// ladder rungs use different deadlines.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError::PositionUnavailable`] if the HTTP client
    /// cannot be constructed.
    pub fn new(url: &str, user_agent: &str) -> Result<Self, PositionError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(user_agent)
            .build()
            .map_err(|e| PositionError::PositionUnavailable {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
            last_fix: Mutex::new(None),
        })
    }

    fn fresh_fix(&self, max_age: Duration) -> Option<RawPosition> {
        if max_age.is_zero() {
            return None;
        }
        let guard = self.last_fix.lock().ok()?;
        let cached = (*guard)?;
        (cached.taken_at.elapsed() <= max_age).then_some(cached.position)
    }

    fn remember(&self, position: RawPosition) {
        if let Ok(mut guard) = self.last_fix.lock() {
            *guard = Some(CachedFix {
                position,
                taken_at: Instant::now(),
            });
        }
    }
}

#[async_trait]
impl PositionProvider for GeolocateClient {
    async fn request_position(
        &self,
        options: &PositionOptions,
    ) -> Result<RawPosition, PositionError> {
        if let Some(cached) = self.fresh_fix(options.max_age) {
            tracing::debug!(
                max_age_secs = options.max_age.as_secs(),
                "serving cached position fix"
            );
            return Ok(cached);
        }

        let body = serde_json::json!({ "considerIp": !options.high_accuracy });
        let response = self
            .client
            .post(&self.url)
            .timeout(options.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_request_error(&e, options))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(PositionError::PermissionDenied);
        }
        if !status.is_success() {
            return Err(PositionError::PositionUnavailable {
                reason: format!("geolocate endpoint returned HTTP {status}"),
            });
        }

        let parsed: GeolocateResponse = response
            .json()
            .await
            .map_err(|e| classify_request_error(&e, options))?;

        let fix = RawPosition {
            latitude: parsed.location.lat,
            longitude: parsed.location.lng,
            accuracy_m: parsed.accuracy,
        };
        self.remember(fix);
        Ok(fix)
    }
}

fn classify_request_error(e: &reqwest::Error, options: &PositionOptions) -> PositionError {
    if e.is_timeout() {
        PositionError::Timeout {
            timeout_secs: options.timeout.as_secs(),
        }
    } else {
        PositionError::PositionUnavailable {
            reason: e.to_string(),
        }
    }
}
