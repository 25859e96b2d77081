//! Types shared between the glustervol driver and its callers.
//!
//! Holds the caller-facing error enum and the value types a transport
//! layer would serialize, so the driver crate and any future protocol
//! surface agree on one vocabulary.

pub mod errors;
pub mod types;

pub use errors::{DriverError, DriverResult};
pub use types::{Capabilities, CapabilityScope, VolumeInfo};
