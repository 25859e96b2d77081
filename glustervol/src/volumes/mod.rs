//! Volume entities and mountpoint addressing.

mod address;
mod record;

pub use address::derive_mountpoint;
pub use record::VolumeRecord;
