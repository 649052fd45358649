//! Serde model of a product definition's volume templates.

use serde::Deserialize;

use crate::volumes::{FsType, VolumeOutline};

/// Top-level product definition document.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ProductDefinition {
    #[serde(default)]
    pub volume_templates: Vec<VolumeTemplate>,
}

/// One volume template from a product definition.
///
/// Everything except `mount_path` defaults safely when omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VolumeTemplate {
    /// Mount path the volume is created for.
    pub mount_path: String,

    /// Filesystem the product selects by default.
    ///
    /// When omitted, the first entry of the outline's filesystem list is
    /// used.
    #[serde(default)]
    pub filesystem: Option<FsType>,

    /// Extra mount options for the final fstab entry.
    #[serde(default)]
    pub mount_options: Vec<String>,

    /// Whether snapshots start enabled for this volume.
    #[serde(default)]
    pub snapshots: bool,

    /// Sizing rules; missing fields keep their safe defaults.
    #[serde(default)]
    pub outline: VolumeOutline,
}
