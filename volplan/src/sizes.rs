//! Disk size quantities for volume planning.
//!
//! Sizes are byte counts with two named sentinels: [`DiskSize::ZERO`] and
//! [`DiskSize::UNLIMITED`]. Product definitions spell sizes either as raw
//! byte numbers or as strings with a binary-unit suffix (`"512 MiB"`,
//! `"10 GiB"`, `"unlimited"`).

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error returned when a size string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid disk size: '{0}'")]
pub struct ParseDiskSizeError(String);

/// Byte quantity used for volume size bounds.
///
/// Using a dedicated type prevents mixing sizes with counts or
/// percentages, and gives the two range ends a name instead of ambient
/// magic values. `UNLIMITED` compares greater than every finite size, so
/// ordinary comparisons work for bound checks.
///
/// # Example
///
/// ```
/// use volplan::DiskSize;
///
/// let min = DiskSize::from_gib(5);
/// assert!(min < DiskSize::UNLIMITED);
/// assert_eq!("5 GiB".parse::<DiskSize>().unwrap(), min);
/// assert_eq!("unlimited".parse::<DiskSize>().unwrap(), DiskSize::UNLIMITED);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DiskSize(u64);

impl DiskSize {
    /// No space at all.
    pub const ZERO: DiskSize = DiskSize(0);

    /// No upper bound.
    ///
    /// Represented as `u64::MAX`, so it sorts after every finite size.
    pub const UNLIMITED: DiskSize = DiskSize(u64::MAX);

    /// Create from a raw byte count.
    #[inline]
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    /// Create from kibibytes (1 KiB = 1024 bytes).
    #[inline]
    pub const fn from_kib(kib: u64) -> Self {
        Self(kib * 1024)
    }

    /// Create from mebibytes (1 MiB = 1024² bytes).
    #[inline]
    pub const fn from_mib(mib: u64) -> Self {
        Self(mib * 1024 * 1024)
    }

    /// Create from gibibytes (1 GiB = 1024³ bytes).
    #[inline]
    pub const fn from_gib(gib: u64) -> Self {
        Self(gib * 1024 * 1024 * 1024)
    }

    /// Get the raw byte count (`u64::MAX` for `UNLIMITED`).
    #[inline]
    pub const fn as_bytes(&self) -> u64 {
        self.0
    }

    /// Get the size in mebibytes (truncating).
    #[inline]
    pub const fn as_mib(&self) -> u64 {
        self.0 / (1024 * 1024)
    }

    /// Get the size in gibibytes (truncating).
    #[inline]
    pub const fn as_gib(&self) -> u64 {
        self.0 / (1024 * 1024 * 1024)
    }

    /// Check if this is the zero size.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if this is the unlimited sentinel.
    #[inline]
    pub const fn is_unlimited(&self) -> bool {
        self.0 == u64::MAX
    }
}

impl From<u64> for DiskSize {
    fn from(bytes: u64) -> Self {
        Self(bytes)
    }
}

impl From<DiskSize> for u64 {
    fn from(size: DiskSize) -> Self {
        size.0
    }
}

impl fmt::Display for DiskSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const TIB: u64 = 1024 * 1024 * 1024 * 1024;
        const GIB: u64 = 1024 * 1024 * 1024;
        const MIB: u64 = 1024 * 1024;
        const KIB: u64 = 1024;

        if self.is_unlimited() {
            write!(f, "unlimited")
        } else if self.0 >= TIB && self.0.is_multiple_of(TIB) {
            write!(f, "{} TiB", self.0 / TIB)
        } else if self.0 >= GIB && self.0.is_multiple_of(GIB) {
            write!(f, "{} GiB", self.0 / GIB)
        } else if self.0 >= MIB && self.0.is_multiple_of(MIB) {
            write!(f, "{} MiB", self.0 / MIB)
        } else if self.0 >= KIB && self.0.is_multiple_of(KIB) {
            write!(f, "{} KiB", self.0 / KIB)
        } else {
            write!(f, "{} B", self.0)
        }
    }
}

impl FromStr for DiskSize {
    type Err = ParseDiskSizeError;

    /// Parse a size string.
    ///
    /// Accepted forms: `"unlimited"`, a plain byte count (`"8192"`), or a
    /// number with a binary-unit suffix (`"512 MiB"`, `"10GiB"`). The
    /// space before the suffix is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("unlimited") {
            return Ok(Self::UNLIMITED);
        }

        let (number, suffix) = match trimmed.find(|c: char| !c.is_ascii_digit()) {
            None => (trimmed, ""),
            Some(idx) => (&trimmed[..idx], trimmed[idx..].trim()),
        };

        let value: u64 = number
            .parse()
            .map_err(|_| ParseDiskSizeError(s.to_string()))?;

        let multiplier: u64 = match suffix {
            "" | "B" => 1,
            "KiB" => 1 << 10,
            "MiB" => 1 << 20,
            "GiB" => 1 << 30,
            "TiB" => 1 << 40,
            _ => return Err(ParseDiskSizeError(s.to_string())),
        };

        value
            .checked_mul(multiplier)
            .map(Self)
            .ok_or_else(|| ParseDiskSizeError(s.to_string()))
    }
}

// A size serializes to its byte count, or to the string "unlimited". Both
// forms deserialize, plus any string FromStr accepts.

impl Serialize for DiskSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_unlimited() {
            serializer.serialize_str("unlimited")
        } else {
            serializer.serialize_u64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for DiskSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DiskSizeVisitor;

        impl Visitor<'_> for DiskSizeVisitor {
            type Value = DiskSize;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a byte count or a size string like \"10 GiB\" or \"unlimited\"")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(DiskSize::from_bytes(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                u64::try_from(value)
                    .map(DiskSize::from_bytes)
                    .map_err(|_| E::custom(format!("negative disk size: {}", value)))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(DiskSizeVisitor)
    }
}
