//! Mount point candidates for a storage proposal.

use serde::{Deserialize, Serialize};

use super::filesystem::FsType;
use super::outline::VolumeOutline;
use crate::sizes::DiskSize;

/// A desired mount point in the final storage layout.
///
/// Carries the sizing rules ([`VolumeOutline`]) declared by the product
/// together with the per-proposal settings the sizing solver reads. A
/// proposal computation receives a collection of volumes keyed by
/// `mount_path` and writes nothing back into them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    /// Desired mount point (`/`, `/home`, `swap`, ...).
    pub mount_path: String,

    /// Sizing rules for this candidate.
    pub outline: VolumeOutline,

    /// Selected filesystem type.
    ///
    /// `None` only for volumes whose outline declares no acceptable
    /// filesystem types (volumes that are never auto-created).
    pub fs_type: Option<FsType>,

    /// Extra mount options for the final fstab entry.
    pub mount_options: Vec<String>,

    /// Whether the solver computes the size range instead of using
    /// `min_size`/`max_size` verbatim.
    pub auto_size: bool,

    /// Effective lower size bound when `auto_size` is false.
    pub min_size: DiskSize,

    /// Effective upper size bound when `auto_size` is false.
    pub max_size: DiskSize,

    /// Whether snapshots are enabled for this volume.
    pub snapshots: bool,
}

impl Volume {
    /// Create a volume candidate with settings derived from its outline.
    ///
    /// Defaults: the first acceptable filesystem type, the outline's base
    /// size bounds, automatic sizing whenever the outline reports
    /// adaptive sizes, and snapshots disabled.
    pub fn new(mount_path: impl Into<String>, outline: VolumeOutline) -> Self {
        let fs_type = outline.filesystems.first().copied();
        let auto_size = outline.adaptive_sizes();
        let min_size = outline.base_min_size;
        let max_size = outline.base_max_size;

        Self {
            mount_path: mount_path.into(),
            outline,
            fs_type,
            mount_options: Vec::new(),
            auto_size,
            min_size,
            max_size,
            snapshots: false,
        }
    }

    /// Whether automatic sizing is meaningful for this volume.
    ///
    /// When false, toggling `auto_size` on buys nothing: the outline has
    /// no fallback relations, RAM adjustment or snapshot sizing, so the
    /// solver would land on the base bounds anyway.
    pub fn auto_size_supported(&self) -> bool {
        self.outline.adaptive_sizes()
    }
}
