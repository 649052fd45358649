//! Filesystem kinds a product may declare for its volumes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Filesystem type of a volume.
///
/// A closed enumeration: an unknown kind in product data fails at
/// deserialization instead of surprising the sizing solver later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FsType {
    Btrfs,
    Ext2,
    Ext3,
    Ext4,
    F2fs,
    Swap,
    Vfat,
    Xfs,
}

impl FsType {
    /// Parse a filesystem type from its lowercase name.
    ///
    /// Returns `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "btrfs" => Some(FsType::Btrfs),
            "ext2" => Some(FsType::Ext2),
            "ext3" => Some(FsType::Ext3),
            "ext4" => Some(FsType::Ext4),
            "f2fs" => Some(FsType::F2fs),
            "swap" => Some(FsType::Swap),
            "vfat" => Some(FsType::Vfat),
            "xfs" => Some(FsType::Xfs),
            _ => None,
        }
    }

    /// Canonical lowercase name, as used in product definitions.
    pub fn as_str(&self) -> &'static str {
        match self {
            FsType::Btrfs => "btrfs",
            FsType::Ext2 => "ext2",
            FsType::Ext3 => "ext3",
            FsType::Ext4 => "ext4",
            FsType::F2fs => "f2fs",
            FsType::Swap => "swap",
            FsType::Vfat => "vfat",
            FsType::Xfs => "xfs",
        }
    }

    /// Check if this filesystem can take snapshots.
    ///
    /// Snapshot size reservations only ever apply to these types.
    pub fn supports_snapshots(&self) -> bool {
        matches!(self, FsType::Btrfs)
    }
}

impl fmt::Display for FsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        assert_eq!(FsType::parse("btrfs"), Some(FsType::Btrfs));
        assert_eq!(FsType::parse("ext4"), Some(FsType::Ext4));
        assert_eq!(FsType::parse("swap"), Some(FsType::Swap));
        assert_eq!(FsType::parse("XFS"), Some(FsType::Xfs));
    }

    #[test]
    fn test_parse_unknown_name() {
        assert_eq!(FsType::parse("zfs"), None);
        assert_eq!(FsType::parse(""), None);
    }

    #[test]
    fn test_display_matches_parse() {
        for fs in [
            FsType::Btrfs,
            FsType::Ext2,
            FsType::Ext3,
            FsType::Ext4,
            FsType::F2fs,
            FsType::Swap,
            FsType::Vfat,
            FsType::Xfs,
        ] {
            assert_eq!(FsType::parse(fs.as_str()), Some(fs));
            assert_eq!(format!("{}", fs), fs.as_str());
        }
    }

    #[test]
    fn test_serde_lowercase_names() {
        assert_eq!(serde_json::to_string(&FsType::Btrfs).unwrap(), "\"btrfs\"");
        assert_eq!(
            serde_json::from_str::<FsType>("\"ext4\"").unwrap(),
            FsType::Ext4
        );

        // Unknown kinds are a deserialization error
        assert!(serde_json::from_str::<FsType>("\"zfs\"").is_err());
    }

    #[test]
    fn test_supports_snapshots() {
        assert!(FsType::Btrfs.supports_snapshots());
        assert!(!FsType::Ext4.supports_snapshots());
        assert!(!FsType::Swap.supports_snapshots());
    }
}
