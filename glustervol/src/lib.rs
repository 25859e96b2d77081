//! Reference-counted GlusterFS volume driver.
//!
//! Maps logical volume names to deterministic local mountpoints, shares one
//! underlying glusterfs mount across multiple consumers via reference
//! counting, and persists volume metadata across restarts. The plugin wire
//! protocol and the glusterfs client itself live outside this crate; the
//! driver only performs the operations it is asked to.

pub mod driver;
pub mod mount;
pub mod state;
pub mod volumes;

pub use driver::{DriverConfig, VolumeDriver};
pub use glustervol_shared::{
    Capabilities, CapabilityScope, DriverError, DriverResult, VolumeInfo,
};
