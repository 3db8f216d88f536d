//! Client for the remote sheet endpoint, the primary persistence channel.

use std::time::Duration;

use chrono::{DateTime, Utc};
use logitrack_core::RegistrationRecord;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while submitting to the sheet endpoint.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("sheet endpoint request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("sheet endpoint returned HTTP {status}")]
    Status { status: u16 },
    #[error("sheet endpoint rejected the registration: {reason}")]
    Rejected { reason: String },
}

/// Wire payload for one registration.
///
/// Matches the contract shared with the registration endpoint: camelCase
/// keys, no id or source, because the accepting channel assigns those.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetPayload {
    pub package_code: String,
    pub phone: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_pickup: bool,
    pub timestamp: DateTime<Utc>,
}

impl SheetPayload {
    #[must_use]
    pub fn from_record(record: &RegistrationRecord) -> Self {
        Self {
            package_code: record.package_code.clone(),
            phone: record.phone.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            is_pickup: record.is_pickup,
            timestamp: record.timestamp,
        }
    }
}

/// Acknowledgment envelope returned by the sheet endpoint.
#[derive(Debug, Deserialize)]
struct SheetAck {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the sheet endpoint.
pub struct SheetClient {
    client: Client,
    url: String,
}

impl SheetClient {
    /// Builds a client for the endpoint at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::Http`] if the HTTP client cannot be
    /// constructed.
    pub fn new(url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SheetError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// POSTs one registration and checks the `{success, error}` envelope.
    ///
    /// # Errors
    ///
    /// - [`SheetError::Http`] — transport failure, timeout, or an
    ///   unreadable response body.
    /// - [`SheetError::Status`] — a non-2xx response.
    /// - [`SheetError::Rejected`] — a 2xx response with `success: false`.
    pub async fn submit(&self, payload: &SheetPayload) -> Result<(), SheetError> {
        let response = self.client.post(&self.url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SheetError::Status {
                status: status.as_u16(),
            });
        }

        let ack: SheetAck = response.json().await?;
        if !ack.success {
            return Err(SheetError::Rejected {
                reason: ack
                    .error
                    .unwrap_or_else(|| "no reason given".to_string()),
            });
        }
        Ok(())
    }
}
