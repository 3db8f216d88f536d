//! Position acquisition for the logitrack workspace.
//!
//! The [`PositionProvider`] trait abstracts over whatever can produce a
//! device position (the bundled [`GeolocateClient`] talks to an
//! MLS-compatible HTTP service). On top of it, [`LocationAcquirer`] runs the
//! retry/degrade ladder: one high-accuracy attempt, and on timeout only, one
//! low-accuracy attempt with a longer deadline.

pub mod acquire;
pub mod geolocate;
pub mod provider;

pub use acquire::{
    AcquireObserver, AcquirePolicy, Acquisition, AttemptOutcome, LocationAcquirer,
    LocationError, LocationErrorKind,
};
pub use geolocate::GeolocateClient;
pub use provider::{PositionError, PositionOptions, PositionProvider, RawPosition};
