//! Value types exposed through the volume-plugin contract.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Summary of a volume as reported by `get` and `list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeInfo {
    pub name: String,
    pub mountpoint: PathBuf,
}

/// Scope advertised by the driver.
///
/// `Local` means volumes are bound to the host the driver runs on; a
/// cluster-wide driver would advertise `Global`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityScope {
    Local,
    Global,
}

/// Static capability descriptor returned by the `capabilities` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub scope: CapabilityScope,
}
