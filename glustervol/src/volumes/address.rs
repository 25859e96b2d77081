//! Deterministic mountpoint derivation.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Derive the local mountpoint for a volume identity.
///
/// Each of the three identity strings is hashed independently and the hex
/// digests are joined as nested path segments under `root`, so two volumes
/// differing in any single field land in disjoint directories. Pure and
/// deterministic; collisions would require breaking SHA-256.
pub fn derive_mountpoint(root: &Path, name: &str, volname: &str, subdir: &str) -> PathBuf {
    root.join(digest(name)).join(digest(volname)).join(digest(subdir))
}

fn digest(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}
