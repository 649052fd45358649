//! Volume candidates and their sizing rules.
//!
//! - `VolumeOutline` - declarative sizing rules for one mount point
//! - `Volume` - a mount point candidate carrying its outline
//! - `FsType` - closed enumeration of supported filesystem kinds

mod filesystem;
mod outline;
mod volume;

pub use filesystem::FsType;
pub use outline::VolumeOutline;
pub use volume::Volume;
