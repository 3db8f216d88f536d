//! The location retry/degrade ladder.
//!
//! One acquisition spends at most `max_attempts` provider requests. The
//! first runs at high accuracy; only a timeout there earns one more attempt,
//! at low accuracy with a longer deadline. Permission and availability
//! failures are environment problems a retry cannot fix, so they end the
//! ladder immediately.

use std::fmt;
use std::time::Duration;

use logitrack_core::{AppConfig, Coordinate};
use thiserror::Error;

use crate::provider::{PositionError, PositionOptions, PositionProvider, RawPosition};

/// Timeouts and ceilings for one acquisition ladder.
#[derive(Debug, Clone, Copy)]
pub struct AcquirePolicy {
    pub high_accuracy_timeout: Duration,
    pub low_accuracy_timeout: Duration,
    /// Maximum age of a cached fix the provider may serve.
    pub max_age: Duration,
    /// Total request ceiling, counting the first attempt. Values below 1
    /// behave as 1.
    pub max_attempts: u32,
    /// Pause between a timed-out high-accuracy attempt and the low-accuracy
    /// retry.
    pub retry_delay: Duration,
}

impl Default for AcquirePolicy {
    fn default() -> Self {
        Self {
            high_accuracy_timeout: Duration::from_secs(10),
            low_accuracy_timeout: Duration::from_secs(20),
            max_age: Duration::from_secs(60),
            max_attempts: 2,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl AcquirePolicy {
    /// Policy from the configured ladder knobs; the inter-attempt delay
    /// keeps its built-in default.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            high_accuracy_timeout: Duration::from_secs(config.high_accuracy_timeout_secs),
            low_accuracy_timeout: Duration::from_secs(config.low_accuracy_timeout_secs),
            max_age: Duration::from_secs(config.max_position_age_secs),
            max_attempts: config.max_position_attempts,
            ..Self::default()
        }
    }
}

/// Uniform classification of a terminal acquisition failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationErrorKind {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
}

impl fmt::Display for LocationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LocationErrorKind::PermissionDenied => "permission denied",
            LocationErrorKind::PositionUnavailable => "position unavailable",
            LocationErrorKind::Timeout => "timeout",
            LocationErrorKind::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

/// Terminal failure of an acquisition ladder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("positioning permission denied")]
    PermissionDenied,
    #[error("position unavailable: {reason}")]
    PositionUnavailable { reason: String },
    #[error("positioning timed out after {attempts} attempt(s)")]
    Timeout { attempts: u32 },
    #[error("unexpected positioning failure: {reason}")]
    Unknown { reason: String },
}

impl LocationError {
    #[must_use]
    pub fn kind(&self) -> LocationErrorKind {
        match self {
            LocationError::PermissionDenied => LocationErrorKind::PermissionDenied,
            LocationError::PositionUnavailable { .. } => LocationErrorKind::PositionUnavailable,
            LocationError::Timeout { .. } => LocationErrorKind::Timeout,
            LocationError::Unknown { .. } => LocationErrorKind::Unknown,
        }
    }
}

/// A successful acquisition: the validated coordinate plus how it was won.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Acquisition {
    pub coordinate: Coordinate,
    pub accuracy_m: f64,
    /// Whether the winning attempt ran in high-accuracy mode.
    pub high_accuracy: bool,
    /// Provider requests spent, counting the winning one.
    pub attempts: u32,
}

/// Result of a single provider attempt, as reported to observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttemptOutcome {
    Success {
        coordinate: Coordinate,
        accuracy_m: f64,
    },
    Failure {
        kind: LocationErrorKind,
        high_accuracy: bool,
    },
}

/// Receives ladder progress for rendering. All methods default to no-ops.
pub trait AcquireObserver {
    /// Called before each provider request.
    fn attempt_started(&self, attempt: u32, high_accuracy: bool) {
        let _ = (attempt, high_accuracy);
    }

    /// Called after each provider request resolves, success or failure.
    fn attempt_finished(&self, outcome: &AttemptOutcome) {
        let _ = outcome;
    }
}

/// No-op observer for callers that only want the final result.
impl AcquireObserver for () {}

/// Drives the retry/degrade ladder over a positioning provider.
///
/// [`acquire`](Self::acquire) takes `&mut self`, so the borrow checker
/// enforces that a single acquirer never runs two ladders at once; a
/// finished call leaves it ready for the next request.
pub struct LocationAcquirer<P> {
    provider: P,
    policy: AcquirePolicy,
}

impl<P: PositionProvider> LocationAcquirer<P> {
    pub fn new(provider: P, policy: AcquirePolicy) -> Self {
        Self { provider, policy }
    }

    /// Runs the ladder to one terminal outcome.
    ///
    /// # Errors
    ///
    /// - [`LocationError::PermissionDenied`] — the provider refused; never
    ///   retried.
    /// - [`LocationError::PositionUnavailable`] — the provider could not
    ///   produce a fix; never retried.
    /// - [`LocationError::Timeout`] — every permitted attempt ran out of
    ///   time.
    /// - [`LocationError::Unknown`] — the provider returned an out-of-range
    ///   fix.
    pub async fn acquire(
        &mut self,
        observer: &impl AcquireObserver,
    ) -> Result<Acquisition, LocationError> {
        let mut attempt: u32 = 0;
        let mut high_accuracy = true;

        loop {
            attempt += 1;
            let options = self.options_for(high_accuracy);
            observer.attempt_started(attempt, high_accuracy);
            tracing::info!(
                attempt,
                high_accuracy,
                timeout_secs = options.timeout.as_secs(),
                "requesting position"
            );

            match self.provider.request_position(&options).await {
                Ok(raw) => return self.accept_fix(observer, raw, high_accuracy, attempt),
                Err(e) => {
                    let kind = failure_kind(&e);
                    observer.attempt_finished(&AttemptOutcome::Failure {
                        kind,
                        high_accuracy,
                    });

                    let retriable = high_accuracy
                        && matches!(e, PositionError::Timeout { .. })
                        && attempt < self.policy.max_attempts;
                    if retriable {
                        tracing::warn!(
                            attempt,
                            error = %e,
                            retry_delay_ms = self.policy.retry_delay.as_millis(),
                            "high-accuracy attempt timed out — retrying at low accuracy"
                        );
                        if !self.policy.retry_delay.is_zero() {
                            tokio::time::sleep(self.policy.retry_delay).await;
                        }
                        high_accuracy = false;
                        continue;
                    }

                    let error = terminal_error(e, attempt);
                    tracing::error!(attempt, error = %error, "position acquisition failed");
                    return Err(error);
                }
            }
        }
    }

    fn accept_fix(
        &self,
        observer: &impl AcquireObserver,
        raw: RawPosition,
        high_accuracy: bool,
        attempts: u32,
    ) -> Result<Acquisition, LocationError> {
        match Coordinate::new(raw.latitude, raw.longitude) {
            Ok(coordinate) => {
                observer.attempt_finished(&AttemptOutcome::Success {
                    coordinate,
                    accuracy_m: raw.accuracy_m,
                });
                tracing::info!(
                    attempts,
                    high_accuracy,
                    accuracy_m = raw.accuracy_m,
                    %coordinate,
                    "position resolved"
                );
                Ok(Acquisition {
                    coordinate,
                    accuracy_m: raw.accuracy_m,
                    high_accuracy,
                    attempts,
                })
            }
            Err(e) => {
                // An out-of-range fix is a provider bug, not a retriable
                // condition.
                let error = LocationError::Unknown {
                    reason: e.to_string(),
                };
                observer.attempt_finished(&AttemptOutcome::Failure {
                    kind: error.kind(),
                    high_accuracy,
                });
                tracing::error!(attempts, error = %error, "provider returned an invalid fix");
                Err(error)
            }
        }
    }

    fn options_for(&self, high_accuracy: bool) -> PositionOptions {
        PositionOptions {
            high_accuracy,
            timeout: if high_accuracy {
                self.policy.high_accuracy_timeout
            } else {
                self.policy.low_accuracy_timeout
            },
            max_age: self.policy.max_age,
        }
    }
}

fn failure_kind(e: &PositionError) -> LocationErrorKind {
    match e {
        PositionError::PermissionDenied => LocationErrorKind::PermissionDenied,
        PositionError::PositionUnavailable { .. } => LocationErrorKind::PositionUnavailable,
        PositionError::Timeout { .. } => LocationErrorKind::Timeout,
    }
}

fn terminal_error(e: PositionError, attempts: u32) -> LocationError {
    match e {
        PositionError::PermissionDenied => LocationError::PermissionDenied,
        PositionError::PositionUnavailable { reason } => {
            LocationError::PositionUnavailable { reason }
        }
        PositionError::Timeout { .. } => LocationError::Timeout { attempts },
    }
}

#[cfg(test)]
#[path = "acquire_test.rs"]
mod tests;
