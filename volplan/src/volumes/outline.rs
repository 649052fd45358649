//! Sizing rules attached to a volume candidate.

use serde::{Deserialize, Serialize};

use super::filesystem::FsType;
use crate::sizes::DiskSize;

/// Set of rules used to fully define and validate a given volume.
///
/// An outline is populated once from product configuration, then read
/// without mutation while a storage proposal is computed. Every declared
/// rule is a plain public field; the derived queries below are pure
/// functions of those fields and are recomputed on every call. The
/// outline itself never validates or rejects values — inconsistent
/// combinations are the loader's job to detect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeOutline {
    /// Whether the volume is mandatory.
    ///
    /// When true, the set of volumes used by a storage proposal always
    /// contains this volume or an equivalent one (same mount path).
    pub required: bool,

    /// Acceptable filesystem types, in preference order.
    ///
    /// May be empty only for volumes that are never auto-created.
    pub filesystems: Vec<FsType>,

    /// Base value for the min size when sizes are computed automatically,
    /// or the default fixed min size otherwise.
    pub base_min_size: DiskSize,

    /// Base value for the max size, symmetric to `base_min_size`.
    pub base_max_size: DiskSize,

    /// Whether the size limits grow with the amount of installed RAM.
    ///
    /// The RAM-based policy itself lives in the sizing solver; the
    /// outline only records that it applies.
    pub adjust_by_ram: bool,

    /// Mount paths of volumes whose min size requirement this volume
    /// absorbs when they are absent from the final layout.
    pub min_size_fallback_for: Vec<String>,

    /// Mount paths of volumes whose max size requirement this volume
    /// absorbs when they are absent from the final layout.
    pub max_size_fallback_for: Vec<String>,

    /// Whether the snapshots option can be toggled for this volume.
    pub snapshots_configurable: bool,

    /// Fixed extra space reserved for snapshots, if any.
    pub snapshots_size: Option<DiskSize>,

    /// Extra space for snapshots, as a percentage of the volume size.
    pub snapshots_percentage: Option<u32>,
}

impl Default for VolumeOutline {
    fn default() -> Self {
        Self {
            required: false,
            filesystems: Vec::new(),
            base_min_size: DiskSize::ZERO,
            base_max_size: DiskSize::UNLIMITED,
            adjust_by_ram: false,
            min_size_fallback_for: Vec::new(),
            max_size_fallback_for: Vec::new(),
            snapshots_configurable: false,
            snapshots_size: None,
            snapshots_percentage: None,
        }
    }
}

impl VolumeOutline {
    /// Related volumes that may affect the calculation of the automatic
    /// size limits.
    ///
    /// Sorted, de-duplicated union of the two fallback lists, so
    /// consumers see a stable dependency list no matter the order the
    /// configuration declared the entries in.
    pub fn size_relevant_volumes(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .min_size_fallback_for
            .iter()
            .chain(self.max_size_fallback_for.iter())
            .cloned()
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }

    /// Whether snapshots affect the automatic calculation of the size
    /// limits.
    ///
    /// An absent size or percentage counts the same as an explicit zero.
    pub fn snapshots_affect_sizes(&self) -> bool {
        if self.snapshots_size.is_some_and(|size| !size.is_zero()) {
            return true;
        }
        self.snapshots_percentage.is_some_and(|percent| percent != 0)
    }

    /// Whether it makes sense to have automatic size limits for the
    /// volume.
    ///
    /// False means the base bounds can be used as-is; true means the
    /// solver needs fallback-, RAM- or snapshot-aware computation.
    pub fn adaptive_sizes(&self) -> bool {
        let has_relevant_volumes =
            !(self.min_size_fallback_for.is_empty() && self.max_size_fallback_for.is_empty());
        has_relevant_volumes || self.adjust_by_ram || self.snapshots_affect_sizes()
    }
}
