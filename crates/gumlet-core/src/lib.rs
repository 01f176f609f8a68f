//! Rewrites image asset URLs onto the Gumlet image CDN.
//!
//! The entry point is [`build_url`]; [`GumletTransformer`] wraps it in the
//! capability set content hosts expect from an image transformer.

pub mod builder;
pub mod config;
pub mod logging;
pub mod params;
pub mod template;
pub mod transform;
pub mod transformer;

pub use builder::build_url;
pub use config::GumletConfig;
pub use params::{parse_key_value, ParamParseError, ParamValue, QueryParams};
pub use template::gumlet_url;
pub use transform::TransformDescriptor;
pub use transformer::{Asset, GumletTransformer, ImageTransform, ImageTransformer};
