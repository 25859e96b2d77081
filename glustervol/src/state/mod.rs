//! Durable volume registry persistence.
//!
//! The whole name → record map is the unit of persistence: every mutation
//! rewrites the file in full. The store is a trait so driver tests can run
//! against a fake without touching a real filesystem.

use std::collections::HashMap;
use std::path::PathBuf;

use glustervol_shared::errors::{DriverError, DriverResult};

use crate::volumes::VolumeRecord;

/// The in-memory registry: volume name → record.
pub type Registry = HashMap<String, VolumeRecord>;

/// Persistence backend for the volume registry.
pub trait StateStore: Send + Sync {
    /// Load the registry. A missing state file yields an empty registry;
    /// an unreadable or malformed one is an error (state corruption is not
    /// auto-recovered).
    fn load(&self) -> DriverResult<Registry>;

    /// Serialize the full registry and overwrite the state file.
    fn save(&self, volumes: &Registry) -> DriverResult<()>;
}

/// `StateStore` over a single JSON file.
///
/// The file is human-diffable and unversioned; schema changes require a
/// fresh file.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> DriverResult<Registry> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(state_path = %self.path.display(), "No state found");
                return Ok(Registry::new());
            }
            Err(err) => {
                return Err(DriverError::Persistence(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    err
                )));
            }
        };

        serde_json::from_slice(&data).map_err(|err| {
            DriverError::Persistence(format!(
                "failed to parse {}: {}",
                self.path.display(),
                err
            ))
        })
    }

    fn save(&self, volumes: &Registry) -> DriverResult<()> {
        let data = serde_json::to_vec_pretty(volumes).map_err(|err| {
            DriverError::Persistence(format!("failed to serialize state: {}", err))
        })?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| {
                DriverError::Persistence(format!(
                    "failed to create {}: {}",
                    parent.display(),
                    err
                ))
            })?;
        }

        std::fs::write(&self.path, data).map_err(|err| {
            DriverError::Persistence(format!(
                "failed to write {}: {}",
                self.path.display(),
                err
            ))
        })
    }
}
