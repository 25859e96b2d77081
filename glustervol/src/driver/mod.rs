//! Thread-safe volume lifecycle controller.
//!
//! All operations go through `VolumeDriver`, which owns the registry behind
//! a single `RwLock`: mutating operations hold the write lock for their
//! full duration, including the blocking external mount/unmount call. That
//! guarantees at most one in-flight mount across the process and rules out
//! interleaved filesystem races, at the cost of stalling every other volume
//! operation while an external command runs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use glustervol_shared::errors::{DriverError, DriverResult};
use glustervol_shared::types::{Capabilities, CapabilityScope, VolumeInfo};

use crate::mount::{GlusterBackend, MountBackend, ensure_dir};
use crate::state::{FileStateStore, Registry, StateStore};
use crate::volumes::{VolumeRecord, derive_mountpoint};

mod config;

pub use config::DriverConfig;

/// The volume registry and mount lifecycle state machine.
///
/// Cheaply cloneable via `Arc`; all clones share the same registry.
#[derive(Clone)]
pub struct VolumeDriver {
    inner: Arc<RwLock<DriverInner>>,
}

struct DriverInner {
    volumes: Registry,
    store: Arc<dyn StateStore>,
    backend: Arc<dyn MountBackend>,
    config: DriverConfig,
}

impl std::fmt::Debug for VolumeDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VolumeDriver").finish()
    }
}

/// Log a caller-facing error before returning it, so every failed
/// operation leaves a trace server-side as well.
fn log_err(err: DriverError) -> DriverError {
    tracing::error!("{err}");
    err
}

fn split_servers(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn dir_is_empty(path: &Path) -> std::io::Result<bool> {
    Ok(std::fs::read_dir(path)?.next().is_none())
}

impl DriverInner {
    /// Best-effort durability: a failed write is logged and absorbed, so
    /// the on-disk view may lag the in-memory registry until the next
    /// successful save.
    fn persist(&self) {
        if let Err(err) = self.store.save(&self.volumes) {
            tracing::error!("{err}");
        }
    }
}

impl VolumeDriver {
    /// Create a driver with explicit store and backend (injectable for
    /// tests). Loads the registry; a corrupt state file is fatal here.
    pub fn new(
        config: DriverConfig,
        store: Arc<dyn StateStore>,
        backend: Arc<dyn MountBackend>,
    ) -> DriverResult<Self> {
        let mut volumes = store.load()?;

        // A mount never survives a restart: the in-memory accounting is
        // gone, so every record starts over with zero consumers. The
        // backing mount state on disk is deliberately not re-probed.
        for volume in volumes.values_mut() {
            volume.connections = 0;
        }

        tracing::info!(
            volumes = volumes.len(),
            state_path = %config.state_path.display(),
            "Loaded volume registry"
        );

        Ok(Self {
            inner: Arc::new(RwLock::new(DriverInner {
                volumes,
                store,
                backend,
                config,
            })),
        })
    }

    /// Open a driver with the real file store and gluster backend.
    pub fn open(config: DriverConfig) -> DriverResult<Self> {
        let store = Arc::new(FileStateStore::new(config.state_path.clone()));
        Self::new(config, store, Arc::new(GlusterBackend::new()))
    }

    fn read(&self) -> DriverResult<RwLockReadGuard<'_, DriverInner>> {
        self.inner
            .read()
            .map_err(|err| DriverError::Internal(format!("driver lock poisoned: {err}")))
    }

    fn write(&self) -> DriverResult<RwLockWriteGuard<'_, DriverInner>> {
        self.inner
            .write()
            .map_err(|err| DriverError::Internal(format!("driver lock poisoned: {err}")))
    }

    /// Register a volume.
    ///
    /// Recognized option keys are `subdir`, `volname` and `servers`
    /// (comma-separated); anything else is passed through verbatim as an
    /// extra mount option. An existing record of the same name is replaced
    /// without checking for active references (last write wins).
    pub fn create(&self, name: &str, options: &HashMap<String, String>) -> DriverResult<()> {
        tracing::debug!(volume = %name, ?options, "Creating volume");
        let mut inner = self.write()?;

        let mut volume = VolumeRecord {
            name: name.to_string(),
            subdir: name.to_string(),
            volname: inner.config.default_volname.clone(),
            servers: split_servers(&inner.config.default_servers),
            options: Vec::new(),
            mountpoint: PathBuf::new(),
            subdir_mountpoint: None,
            connections: 0,
        };

        for (key, value) in options {
            match key.as_str() {
                "subdir" => volume.subdir = value.clone(),
                "volname" => volume.volname = value.clone(),
                "servers" => volume.servers = split_servers(value),
                _ if value.is_empty() => volume.options.push(key.clone()),
                _ => volume.options.push(format!("{key}={value}")),
            }
        }

        if volume.subdir.is_empty() {
            return Err(log_err(DriverError::Validation(
                "'subdir' option required".to_string(),
            )));
        }
        if volume.volname.is_empty() {
            return Err(log_err(DriverError::Validation(
                "'volname' option required".to_string(),
            )));
        }
        if volume.servers.is_empty() {
            return Err(log_err(DriverError::Validation(
                "'servers' option required".to_string(),
            )));
        }

        volume.mountpoint = derive_mountpoint(
            &inner.config.volumes_root,
            &volume.name,
            &volume.volname,
            &volume.subdir,
        );

        inner.volumes.insert(name.to_string(), volume);
        inner.persist();
        Ok(())
    }

    /// Drop a volume. Refused while referenced, and refused unless the
    /// mountpoint directory can be confirmed empty: deleting a non-empty
    /// mountpoint would wipe data for every consumer of the same share and
    /// subdir, so an unverifiable directory counts as non-empty.
    pub fn remove(&self, name: &str) -> DriverResult<()> {
        tracing::debug!(volume = %name, "Removing volume");
        let mut inner = self.write()?;

        let volume = match inner.volumes.get(name) {
            Some(volume) => volume,
            None => return Err(log_err(DriverError::NotFound(name.to_string()))),
        };

        if volume.connections != 0 {
            return Err(log_err(DriverError::InUse(name.to_string())));
        }

        match dir_is_empty(&volume.mountpoint) {
            Ok(true) => {}
            Ok(false) | Err(_) => {
                return Err(log_err(DriverError::NotEmpty(name.to_string())));
            }
        }

        std::fs::remove_dir_all(&volume.mountpoint).map_err(|err| log_err(err.into()))?;
        inner.volumes.remove(name);
        inner.persist();
        Ok(())
    }

    /// Attach a consumer. The real mount happens only on the 0→1
    /// transition; afterwards the existing subdirectory path is reused and
    /// the reference count incremented. A failed attach leaves the record
    /// unmounted with the count untouched.
    pub fn mount(&self, name: &str) -> DriverResult<PathBuf> {
        tracing::debug!(volume = %name, "Mounting volume");
        let mut inner = self.write()?;
        let inner = &mut *inner;

        let volume = match inner.volumes.get_mut(name) {
            Some(volume) => volume,
            None => return Err(log_err(DriverError::NotFound(name.to_string()))),
        };

        if volume.connections == 0 {
            ensure_dir(&volume.mountpoint, "mountpoint").map_err(log_err)?;
            let subdir = inner.backend.attach(volume).map_err(log_err)?;
            volume.subdir_mountpoint = Some(subdir);
        }

        volume.connections += 1;
        let path = volume.subdir_mountpoint.clone().unwrap_or_default();
        inner.persist();
        Ok(path)
    }

    /// Detach a consumer. When the count reaches zero the backing share is
    /// really unmounted; the count stays clamped at exactly zero even when
    /// the external unmount fails, and the failure is surfaced after the
    /// clamp — the decrement is trusted over the command's outcome.
    pub fn unmount(&self, name: &str) -> DriverResult<()> {
        tracing::debug!(volume = %name, "Unmounting volume");
        let mut inner = self.write()?;
        let inner = &mut *inner;

        let volume = match inner.volumes.get_mut(name) {
            Some(volume) => volume,
            None => return Err(log_err(DriverError::NotFound(name.to_string()))),
        };

        volume.connections = volume.connections.saturating_sub(1);
        let mut detach_result = Ok(());
        if volume.connections == 0 {
            detach_result = inner.backend.detach(&volume.mountpoint);
        }

        inner.persist();
        detach_result.map_err(log_err)
    }

    /// Mountpoint of a volume (shared lock; purely read-only).
    pub fn path(&self, name: &str) -> DriverResult<PathBuf> {
        tracing::debug!(volume = %name, "Resolving volume path");
        let inner = self.read()?;

        match inner.volumes.get(name) {
            Some(volume) => Ok(volume.mountpoint.clone()),
            None => Err(log_err(DriverError::NotFound(name.to_string()))),
        }
    }

    /// Inspect one volume. Reports the consumer-facing subdirectory path,
    /// which is empty until the volume has been mounted once.
    pub fn get(&self, name: &str) -> DriverResult<VolumeInfo> {
        tracing::debug!(volume = %name, "Inspecting volume");
        let inner = self.write()?;

        match inner.volumes.get(name) {
            Some(volume) => Ok(VolumeInfo {
                name: name.to_string(),
                mountpoint: volume.subdir_mountpoint.clone().unwrap_or_default(),
            }),
            None => Err(log_err(DriverError::NotFound(name.to_string()))),
        }
    }

    /// List all volumes with their mountpoints. Never fails; an empty
    /// registry yields an empty list.
    pub fn list(&self) -> DriverResult<Vec<VolumeInfo>> {
        tracing::debug!("Listing volumes");
        let inner = self.write()?;

        Ok(inner
            .volumes
            .iter()
            .map(|(name, volume)| VolumeInfo {
                name: name.clone(),
                mountpoint: volume.mountpoint.clone(),
            })
            .collect())
    }

    /// Static capability descriptor: volumes are local to this host.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            scope: CapabilityScope::Local,
        }
    }
}
