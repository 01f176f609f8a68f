//! Host transform descriptors and their mapping onto Gumlet parameters.
//!
//! The descriptor is the host's view of a transform (width, height, quality,
//! format, mode, position). The lookup tables translate its values into the
//! names Gumlet expects.

mod descriptor;
mod format;
mod geometry;

pub use descriptor::TransformDescriptor;
pub use format::{map_format, SUPPORTED_FORMATS};
pub use geometry::{map_mode, map_position};
