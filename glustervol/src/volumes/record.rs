//! The per-volume record tracked by the driver.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One logical volume known to the driver.
///
/// Identity and addressing (`name`, `volname`, `subdir`, `servers`,
/// `options`, `mountpoint`) are fixed at creation time. `subdir_mountpoint`
/// and `connections` are live mount state: the reference count is
/// serialized with the rest of the record but zeroed on every load, since
/// in-memory accounting cannot survive a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeRecord {
    /// Unique volume name, assigned by the caller at creation.
    pub name: String,
    /// Path within the backing share exposed as the volume's content root.
    pub subdir: String,
    /// Name of the backing gluster share on the server cluster.
    pub volname: String,
    /// Ordered list of backend endpoints.
    pub servers: Vec<String>,
    /// Opaque extra mount flags, passed through as `-o <opt>`.
    pub options: Vec<String>,
    /// Local directory where the backing share gets attached.
    pub mountpoint: PathBuf,
    /// Concrete path handed to consumers; set on each 0→1 mount
    /// transition, stale (but retained) once the count drops back to 0.
    #[serde(default)]
    pub subdir_mountpoint: Option<PathBuf>,
    /// Number of live consumers currently using the volume.
    #[serde(default)]
    pub connections: u64,
}

impl VolumeRecord {
    /// Source argument for the mount command:
    /// `server1,server2,...:/volname`.
    pub fn mount_source(&self) -> String {
        format!("{}:/{}", self.servers.join(","), self.volname)
    }
}
