//! Product-definition loading.
//!
//! A product definition declares one volume template per supported mount
//! point. The reader deserializes the templates, runs the consistency
//! checks the outlines themselves never perform, and populates the
//! volumes a storage proposal starts from.

mod reader;
mod template;

pub use reader::{VolumeTemplatesReader, read_volumes};
pub use template::VolumeTemplate;
