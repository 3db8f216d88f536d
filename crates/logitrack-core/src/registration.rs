//! Registration records and the delivery location selection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;

/// Where the user wants the package delivered, if anywhere yet.
///
/// `Unset` blocks submission; `Pickup` needs no live coordinate because the
/// fixed pickup point is substituted at submit time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LocationSelection {
    /// A live or manually supplied delivery coordinate.
    Resolved(Coordinate),
    /// Collect at the fixed pickup point instead of delivering.
    Pickup,
    /// Nothing chosen yet.
    #[default]
    Unset,
}

impl LocationSelection {
    /// Whether the selection allows a submission to proceed.
    #[must_use]
    pub fn is_set(&self) -> bool {
        !matches!(self, LocationSelection::Unset)
    }

    /// Resolves the coordinate a submission would carry, plus the pickup flag.
    ///
    /// `Pickup` substitutes the supplied pickup point; `Unset` resolves to
    /// nothing.
    #[must_use]
    pub fn effective(&self, pickup_point: Coordinate) -> Option<(Coordinate, bool)> {
        match self {
            LocationSelection::Resolved(coordinate) => Some((*coordinate, false)),
            LocationSelection::Pickup => Some((pickup_point, true)),
            LocationSelection::Unset => None,
        }
    }
}

/// Raw registration fields plus the location selection, assembled at submit
/// time by whichever surface collected them.
#[derive(Debug, Clone)]
pub struct RegistrationInput {
    pub package_code: String,
    pub phone: String,
    pub selection: LocationSelection,
}

/// Which persistence channel accepted a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageSource {
    /// The remote sheet endpoint.
    Remote,
    /// The on-device registration log.
    Local,
}

impl std::fmt::Display for StorageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageSource::Remote => write!(f, "remote"),
            StorageSource::Local => write!(f, "local"),
        }
    }
}

/// A persisted registration.
///
/// Never mutated after creation; the local log keeps these most recent
/// first. Field names follow the camelCase contract shared with the sheet
/// endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    /// Epoch milliseconds at creation; doubles as a submission id.
    pub id: i64,
    pub package_code: String,
    /// Normalized to bare digits before persisting.
    pub phone: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_pickup: bool,
    pub timestamp: DateTime<Utc>,
    /// The channel that actually accepted the write, not the one tried first.
    pub source: StorageSource,
}

#[cfg(test)]
#[path = "registration_test.rs"]
mod tests;
