//! volplan - volume planning rules for automated storage proposals.
//!
//! An OS installer's proposal engine has to decide, for every desired
//! mount point, whether the volume is mandatory, which filesystem types
//! are acceptable, and what size range it should occupy given the
//! installed RAM, snapshot settings and the other volumes in play. This
//! crate holds the declarative side of that decision:
//!
//! - [`VolumeOutline`] - the sizing rules attached to one mount point
//!   candidate, with derived predicates the sizing solver consumes
//! - [`Volume`] - a mount point candidate carrying its outline and the
//!   per-proposal settings
//! - [`product`] - loading and validation of volume templates from a
//!   product definition
//!
//! The size-solving algorithm itself is not part of this crate; it reads
//! populated volumes and writes nothing back.

pub mod errors;
pub mod product;
pub mod sizes;
pub mod volumes;

pub use errors::{VolplanError, VolplanResult};
pub use product::{VolumeTemplate, VolumeTemplatesReader, read_volumes};
pub use sizes::{DiskSize, ParseDiskSizeError};
pub use volumes::{FsType, Volume, VolumeOutline};
