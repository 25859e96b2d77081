//! Error types for glustervol.
//!
//! Every operation returns `DriverResult<T>`. Callers see a single
//! descriptive message per failure; there are no structured error codes
//! in the plugin contract, so `Display` is the whole caller-facing
//! surface.

use thiserror::Error;

/// Result type used throughout glustervol.
pub type DriverResult<T> = Result<T, DriverError>;

/// All failure modes of the volume driver.
#[derive(Debug, Error)]
pub enum DriverError {
    /// A required field resolved empty at create time.
    #[error("{0}")]
    Validation(String),

    /// No volume registered under the given name.
    #[error("volume {0} not found")]
    NotFound(String),

    /// Remove attempted while the volume still has active consumers.
    #[error("volume {0} is currently used by a container")]
    InUse(String),

    /// Remove attempted on a mountpoint that is not empty, or whose
    /// emptiness could not be verified.
    #[error(
        "directory for volume {0} where the volume is mounted is not empty. \
         This would result in complete removal of all data. Please stop all \
         containers that mount the same volume and subdirectory and try again"
    )]
    NotEmpty(String),

    /// An external mount/umount invocation failed. The message may carry
    /// diagnostic log content recovered from the gluster client.
    #[error("{0}")]
    External(String),

    /// Filesystem operation (stat/create/delete) failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// State file could not be loaded or written.
    #[error("state persistence failed: {0}")]
    Persistence(String),

    /// Invariant violation inside the driver, e.g. a poisoned lock.
    #[error("internal error: {0}")]
    Internal(String),
}
