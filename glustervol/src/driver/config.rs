//! Static driver configuration.

use std::path::{Path, PathBuf};

/// Configuration for a `VolumeDriver` (set once at startup, never changes).
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Root directory under which mountpoints are derived.
    pub volumes_root: PathBuf,
    /// Location of the JSON state file.
    pub state_path: PathBuf,
    /// Backing share used when `create` gets no `volname` option.
    pub default_volname: String,
    /// Comma-separated endpoint list used when `create` gets no `servers`
    /// option.
    pub default_servers: String,
}

impl DriverConfig {
    /// Standard layout under a single root directory:
    /// mountpoints under `<root>/volumes`, state at
    /// `<root>/state/gfs-state.json`.
    pub fn from_root(
        root: impl AsRef<Path>,
        default_servers: impl Into<String>,
        default_volname: impl Into<String>,
    ) -> Self {
        let root = root.as_ref();
        Self {
            volumes_root: root.join("volumes"),
            state_path: root.join("state").join("gfs-state.json"),
            default_volname: default_volname.into(),
            default_servers: default_servers.into(),
        }
    }
}
