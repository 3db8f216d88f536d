//! Registration persistence for the logitrack workspace.
//!
//! Two channels: the remote sheet endpoint ([`SheetClient`]) and the
//! on-device [`RegistrationLog`]. The [`SubmissionCoordinator`] ties them
//! together: validate, try the remote channel once, fall back to the local
//! log on any failure.

pub mod log;
pub mod sheet;
pub mod submit;

pub use log::{LogError, RegistrationLog, REGISTRATION_LOG_FILE};
pub use sheet::{SheetClient, SheetError, SheetPayload};
pub use submit::{SubmissionCoordinator, SubmissionReceipt, SubmitError};
