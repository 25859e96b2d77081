//! Mount backends.
//!
//! The driver talks to the OS through the narrow `MountBackend` capability
//! so tests can swap in a mock and count real attach/detach transitions.

mod gluster;

pub use gluster::GlusterBackend;

use std::path::{Path, PathBuf};

use glustervol_shared::errors::{DriverError, DriverResult};

use crate::volumes::VolumeRecord;

/// Attaches and detaches the backing share for a volume.
pub trait MountBackend: Send + Sync {
    /// Mount the volume's backing share at its mountpoint and return the
    /// subdirectory path to hand to consumers.
    fn attach(&self, volume: &VolumeRecord) -> DriverResult<PathBuf>;

    /// Unmount whatever is attached at `mountpoint`.
    fn detach(&self, mountpoint: &Path) -> DriverResult<()>;
}

/// Ensure `path` exists and is a directory, creating it if absent.
///
/// Symlinks are not followed: a symlink at `path` counts as a
/// non-directory.
pub(crate) fn ensure_dir(path: &Path, what: &str) -> DriverResult<()> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(DriverError::Io(std::io::Error::other(format!(
            "{what} {} already exists and is not a directory",
            path.display()
        )))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            std::fs::create_dir_all(path)?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
