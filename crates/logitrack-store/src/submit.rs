//! The submission coordinator: remote-first persistence with local fallback.

use chrono::Utc;
use logitrack_core::{
    normalize_phone, validate_registration, AppConfig, Coordinate, RegistrationInput,
    RegistrationRecord, StorageSource, ValidationError,
};
use thiserror::Error;

use crate::log::{LogError, RegistrationLog};
use crate::sheet::{SheetClient, SheetError, SheetPayload};

/// A submission that never reached any persistence channel.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no persistence channel accepted the registration: {source}")]
    PersistenceUnavailable {
        #[source]
        source: LogError,
    },
}

/// Outcome of an accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub record: RegistrationRecord,
    /// Local log length after the write; `None` when the remote channel
    /// accepted it.
    pub log_len: Option<usize>,
}

/// Persists validated registrations: one remote attempt, then the local log.
///
/// [`submit`](Self::submit) takes `&mut self`, so a caller cannot overlap
/// two submissions on the same coordinator; every exit leaves it ready for
/// the next attempt.
pub struct SubmissionCoordinator {
    sheet: Option<SheetClient>,
    log: RegistrationLog,
    pickup_point: Coordinate,
}

impl SubmissionCoordinator {
    #[must_use]
    pub fn new(
        sheet: Option<SheetClient>,
        log: RegistrationLog,
        pickup_point: Coordinate,
    ) -> Self {
        Self {
            sheet,
            log,
            pickup_point,
        }
    }

    /// Builds a coordinator from the application config. No configured
    /// sheet URL means the remote channel is skipped entirely.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError`] if the sheet client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, SheetError> {
        let sheet = match &config.sheet_url {
            Some(url) => Some(SheetClient::new(
                url,
                config.request_timeout_secs,
                &config.user_agent,
            )?),
            None => None,
        };

        Ok(Self::new(
            sheet,
            RegistrationLog::new(&config.data_dir),
            config.pickup_point,
        ))
    }

    /// Validates the input, resolves the effective coordinate, and persists
    /// the registration.
    ///
    /// The remote channel gets exactly one attempt; any failure there, or no
    /// configured remote at all, falls through to the local log. The
    /// receipt's `source` names the channel that actually accepted the
    /// write.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Validation`] — a field failed validation or no
    ///   location was selected.
    /// - [`SubmitError::PersistenceUnavailable`] — the local log failed
    ///   after the remote channel was exhausted.
    pub async fn submit(
        &mut self,
        input: &RegistrationInput,
    ) -> Result<SubmissionReceipt, SubmitError> {
        validate_registration(input)?;
        let (coordinate, is_pickup) = input
            .selection
            .effective(self.pickup_point)
            .ok_or(ValidationError::MissingLocation)?;

        let now = Utc::now();
        let mut record = RegistrationRecord {
            id: now.timestamp_millis(),
            package_code: input.package_code.trim().to_string(),
            phone: normalize_phone(&input.phone),
            latitude: coordinate.latitude(),
            longitude: coordinate.longitude(),
            is_pickup,
            timestamp: now,
            source: StorageSource::Local,
        };

        if let Some(sheet) = &self.sheet {
            match sheet.submit(&SheetPayload::from_record(&record)).await {
                Ok(()) => {
                    record.source = StorageSource::Remote;
                    tracing::info!(id = record.id, "registration accepted by the sheet endpoint");
                    return Ok(SubmissionReceipt {
                        record,
                        log_len: None,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        id = record.id,
                        error = %e,
                        "remote save failed — falling back to the local log"
                    );
                }
            }
        } else {
            tracing::debug!("no sheet endpoint configured, saving to the local log");
        }

        match self.log.append(record.clone()) {
            Ok(log_len) => {
                tracing::info!(id = record.id, log_len, "registration saved to the local log");
                Ok(SubmissionReceipt {
                    record,
                    log_len: Some(log_len),
                })
            }
            Err(e) => Err(SubmitError::PersistenceUnavailable { source: e }),
        }
    }

    /// Read access to the local log, for listings.
    #[must_use]
    pub fn log(&self) -> &RegistrationLog {
        &self.log
    }
}
