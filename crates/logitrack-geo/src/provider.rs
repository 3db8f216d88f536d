//! The positioning provider port.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Options for a single positioning attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Ask for the most precise fix the provider can produce. Costs time
    /// and may be more likely to run out of it.
    pub high_accuracy: bool,
    /// How long the provider may spend before the attempt counts as timed
    /// out.
    pub timeout: Duration,
    /// Maximum age of a cached fix the provider may serve instead of taking
    /// a fresh one. Zero forces a fresh fix.
    pub max_age: Duration,
}

/// A raw fix as reported by a provider, before range validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPosition {
    pub latitude: f64,
    pub longitude: f64,
    /// Estimated accuracy radius in meters.
    pub accuracy_m: f64,
}

/// Terminal result of a single provider request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    /// The provider refused to position this client at all.
    #[error("positioning permission denied")]
    PermissionDenied,
    /// The provider answered but could not produce a fix.
    #[error("position unavailable: {reason}")]
    PositionUnavailable { reason: String },
    /// The attempt exceeded its deadline.
    #[error("positioning timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

/// Anything that can produce a device position on demand.
///
/// Implementations must honor `options.timeout`, classifying an overrun as
/// [`PositionError::Timeout`], and may serve a cached fix no older than
/// `options.max_age`.
#[async_trait]
pub trait PositionProvider: Send + Sync {
    /// Produces one position fix under `options`.
    ///
    /// # Errors
    ///
    /// Returns a [`PositionError`] classifying why no fix could be produced.
    async fn request_position(
        &self,
        options: &PositionOptions,
    ) -> Result<RawPosition, PositionError>;
}
