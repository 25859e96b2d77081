//! Backend invoking the system `mount`/`umount` binaries for glusterfs.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use glustervol_shared::errors::{DriverError, DriverResult};

use super::{MountBackend, ensure_dir};
use crate::volumes::VolumeRecord;

const DEFAULT_FSTYPE: &str = "glusterfs";
const DEFAULT_LOG_DIR: &str = "/var/log/glusterfs";

/// Mounts backing shares through the glusterfs fuse client.
///
/// Blocks on the external command for the full call; there is no timeout
/// and no retry. On mount failure the gluster client log is recovered into
/// the error message and then truncated, so the next failure is not
/// conflated with stale output.
pub struct GlusterBackend {
    fstype: String,
    log_dir: PathBuf,
}

impl GlusterBackend {
    pub fn new() -> Self {
        Self::with_paths(DEFAULT_FSTYPE, DEFAULT_LOG_DIR)
    }

    pub fn with_paths(fstype: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            fstype: fstype.into(),
            log_dir: log_dir.into(),
        }
    }

    fn mount_args(&self, volume: &VolumeRecord) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-t".into(), self.fstype.clone().into()];
        for opt in &volume.options {
            args.push("-o".into());
            args.push(opt.clone().into());
        }
        args.push(volume.mount_source().into());
        args.push(volume.mountpoint.clone().into_os_string());
        args
    }

    /// Where the fuse client writes its log for a given mountpoint:
    /// the mountpoint path with `/` flattened to `-`, under the log dir.
    fn client_log_path(&self, mountpoint: &Path) -> PathBuf {
        let flattened = mountpoint.to_string_lossy().replace('/', "-");
        self.log_dir
            .join(format!("{}.log", flattened.trim_matches('-')))
    }

    fn failure_error(&self, mountpoint: &Path, detail: &str) -> DriverError {
        let log_path = self.client_log_path(mountpoint);
        match std::fs::read_to_string(&log_path) {
            Ok(log_data) => {
                if let Err(err) = std::fs::write(&log_path, "") {
                    tracing::warn!(
                        log = %log_path.display(),
                        "Failed to truncate gluster client log: {err}"
                    );
                }
                DriverError::External(format!(
                    "glusterfs command execute failed: {detail}\n{log_data}"
                ))
            }
            Err(log_err) => DriverError::External(format!(
                "glusterfs command execute failed: {detail}; unable to fetch log data {} because {log_err}",
                log_path.display()
            )),
        }
    }
}

impl Default for GlusterBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MountBackend for GlusterBackend {
    fn attach(&self, volume: &VolumeRecord) -> DriverResult<PathBuf> {
        let args = self.mount_args(volume);
        tracing::debug!(volume = %volume.name, ?args, "Invoking mount");

        let output = Command::new("mount")
            .args(&args)
            .output()
            .map_err(|err| DriverError::External(format!("failed to run mount: {err}")))?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            let detail = format!("{} ({})", output.status, combined.trim());
            return Err(self.failure_error(&volume.mountpoint, &detail));
        }

        let subdir = volume.mountpoint.join(&volume.subdir);
        ensure_dir(&subdir, "subdir")?;
        Ok(subdir)
    }

    fn detach(&self, mountpoint: &Path) -> DriverResult<()> {
        tracing::debug!(mountpoint = %mountpoint.display(), "Invoking umount");

        let output = Command::new("umount")
            .arg(mountpoint)
            .output()
            .map_err(|err| DriverError::External(format!("failed to run umount: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DriverError::External(format!(
                "umount {} failed: {} ({})",
                mountpoint.display(),
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}
