//! Shared domain types and configuration for the logitrack workspace.
//!
//! Everything the surfaces (CLI, server) and channels (sheet endpoint, local
//! log) agree on lives here: the validated [`Coordinate`] type, registration
//! records and their wire shape, the field validation rules, and the
//! `LOGITRACK_*` environment configuration.

pub mod app_config;
pub mod config;
pub mod coordinate;
pub mod registration;
pub mod validation;

pub use app_config::AppConfig;
pub use config::{configured_sheet_url, load_app_config, load_app_config_from_env};
pub use coordinate::{default_pickup_point, Coordinate, CoordinateError};
pub use registration::{
    LocationSelection, RegistrationInput, RegistrationRecord, StorageSource,
};
pub use validation::{
    is_valid_package_code, is_valid_phone, normalize_phone, validate_registration,
    ValidationError,
};

use thiserror::Error;

/// Errors raised while resolving configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was set but could not be parsed.
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
