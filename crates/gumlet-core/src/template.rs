//! `gumletUrl`-style template helper taking a loose transform map.

use crate::builder::build_url;
use crate::config::GumletConfig;
use crate::params::QueryParams;
use crate::transform::TransformDescriptor;

/// Builds a Gumlet URL from a template-style transform map.
///
/// Descriptor keys (`width`, `height`, `quality`, `format`, `mode`,
/// `position`) are read from `transform`; its other keys are sent as Gumlet
/// params. Explicit `additional_params` override those leftovers.
pub fn gumlet_url(
    asset_url: &str,
    transform: Option<&QueryParams>,
    additional_params: &QueryParams,
    config: &GumletConfig,
) -> String {
    let Some(transform) = transform else {
        return build_url(asset_url, None, config, additional_params);
    };

    let (descriptor, mut extra) = TransformDescriptor::from_params(transform);
    extra.merge(additional_params);
    build_url(asset_url, Some(&descriptor), config, &extra)
}
