//! Target-volume identification
//!
//! The kiosk cooperates with exactly one physical storage device, recognized
//! by a substring of its OS device identifier (e.g. `/dev/sdb` matches the
//! partitions `/dev/sdb1`, `/dev/sdb2`, ...). Volumes are read-only views of
//! mount-table rows; nothing here owns the device.

mod mounts;

pub use mounts::scan;

use std::path::PathBuf;

/// One storage volume as seen by the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    /// Physical device identifier (first mount-table field).
    pub device: String,
    /// Mount root, absent while the volume is not mounted.
    pub mount_root: Option<PathBuf>,
}

/// Recognizes the one target volume among everything the OS reports.
#[derive(Debug, Clone)]
pub struct VolumeMatcher {
    pattern: String,
}

impl VolumeMatcher {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// True iff the volume's device identifier contains the configured
    /// substring. A missing identifier is a non-match, never an error.
    pub fn is_target(&self, volume: &Volume) -> bool {
        !volume.device.is_empty() && volume.device.contains(&self.pattern)
    }

    /// Mount root of a mounted target volume. A target that is not yet
    /// mounted yields `None`; the caller re-checks once the device watch
    /// reports the mount.
    pub fn resolve_root(&self, volume: &Volume) -> Option<PathBuf> {
        if self.is_target(volume) {
            volume.mount_root.clone()
        } else {
            None
        }
    }

    /// First mounted target volume in a scan, if any.
    pub fn find_target(&self, volumes: &[Volume]) -> Option<PathBuf> {
        volumes.iter().find_map(|v| self.resolve_root(v))
    }
}
