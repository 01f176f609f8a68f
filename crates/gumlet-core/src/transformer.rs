//! Host-facing image transformer.
//!
//! Content hosts drive transforms through a fixed capability set: build a
//! URL, plus index/invalidate/purge hooks for transformers that store
//! derived files. Gumlet transforms on the fly at request time, so only the
//! URL methods do anything here.

use serde::{Deserialize, Serialize};

use crate::builder::build_url;
use crate::config::{self, GumletConfig};
use crate::params::QueryParams;
use crate::transform::TransformDescriptor;

/// An asset as seen by the transformer: just its public URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub url: String,
}

impl Asset {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// A host transform: descriptor fields plus custom Gumlet parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageTransform {
    #[serde(flatten)]
    pub descriptor: TransformDescriptor,
    /// Passed to Gumlet verbatim, overriding anything derived.
    pub gumlet: QueryParams,
}

impl ImageTransform {
    /// Builds a transform from a loose map; unknown keys become Gumlet params.
    pub fn from_params(params: &QueryParams) -> Self {
        let (descriptor, gumlet) = TransformDescriptor::from_params(params);
        Self { descriptor, gumlet }
    }
}

/// Record a host would keep for a generated transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformIndex {
    pub asset_url: String,
    pub descriptor: TransformDescriptor,
}

/// Capability set a host expects from an image transformer.
pub trait ImageTransformer {
    /// URL delivering `asset` with `transform` applied.
    fn transform_url(&self, asset: &Asset, transform: &ImageTransform, immediately: bool)
        -> String;

    /// Drop any stored transforms for `asset`.
    fn invalidate_asset_transforms(&self, asset: &Asset);

    /// Stored index entry for this transform, if the transformer tracks them.
    fn transform_index(&self, asset: &Asset, transform: &ImageTransform)
        -> Option<TransformIndex>;

    fn delete_transform_index(&self, index: &TransformIndex);

    fn purge_transforms_for_asset(&self, asset: &Asset);

    /// URL for a transform the host already indexed.
    fn url_for_transform(
        &self,
        asset: &Asset,
        transform: &ImageTransform,
        index: &TransformIndex,
    ) -> String;
}

/// [`ImageTransformer`] that delivers through Gumlet.
#[derive(Debug, Clone)]
pub struct GumletTransformer {
    config: GumletConfig,
}

impl GumletTransformer {
    pub fn new(config: GumletConfig) -> Self {
        Self { config }
    }

    /// Transformer backed by the on-disk config, or `None` if it can't be
    /// loaded. Hosts should fall back to their own URLs in that case.
    pub fn from_default_config() -> Option<Self> {
        match config::load_or_init() {
            Ok(cfg) => Some(Self::new(cfg)),
            Err(e) => {
                tracing::warn!("gumlet transformer unavailable: {:#}", e);
                None
            }
        }
    }

    pub fn config(&self) -> &GumletConfig {
        &self.config
    }
}

impl ImageTransformer for GumletTransformer {
    fn transform_url(
        &self,
        asset: &Asset,
        transform: &ImageTransform,
        _immediately: bool,
    ) -> String {
        build_url(
            &asset.url,
            Some(&transform.descriptor),
            &self.config,
            &transform.gumlet,
        )
    }

    fn invalidate_asset_transforms(&self, _asset: &Asset) {}

    fn transform_index(
        &self,
        _asset: &Asset,
        _transform: &ImageTransform,
    ) -> Option<TransformIndex> {
        None
    }

    fn delete_transform_index(&self, _index: &TransformIndex) {}

    fn purge_transforms_for_asset(&self, _asset: &Asset) {}

    fn url_for_transform(
        &self,
        asset: &Asset,
        transform: &ImageTransform,
        _index: &TransformIndex,
    ) -> String {
        self.transform_url(asset, transform, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;

    fn transformer() -> GumletTransformer {
        GumletTransformer::new(GumletConfig::for_domain("site.gumlet.io"))
    }

    #[test]
    fn transform_url_uses_custom_params() {
        let transform = ImageTransform {
            descriptor: TransformDescriptor {
                width: Some(800),
                ..Default::default()
            },
            gumlet: [("dpr", ParamValue::Int(2)), ("w", ParamValue::Int(400))]
                .into_iter()
                .collect(),
        };
        let asset = Asset::new("https://assets.example.com/uploads/hero.png");
        assert_eq!(
            transformer().transform_url(&asset, &transform, true),
            "https://site.gumlet.io/uploads/hero.png?w=400&dpr=2&q=80"
        );
    }

    #[test]
    fn url_for_transform_matches_transform_url() {
        let t = transformer();
        let asset = Asset::new("https://assets.example.com/a.jpg");
        let transform = ImageTransform::default();
        let index = TransformIndex {
            asset_url: asset.url.clone(),
            descriptor: TransformDescriptor::default(),
        };
        assert_eq!(
            t.url_for_transform(&asset, &transform, &index),
            t.transform_url(&asset, &transform, false)
        );
    }

    #[test]
    fn index_hooks_are_noops() {
        let t = transformer();
        let asset = Asset::new("https://assets.example.com/a.jpg");
        let transform = ImageTransform::default();
        assert!(t.transform_index(&asset, &transform).is_none());
        t.invalidate_asset_transforms(&asset);
        t.purge_transforms_for_asset(&asset);
        t.delete_transform_index(&TransformIndex {
            asset_url: asset.url.clone(),
            descriptor: TransformDescriptor::default(),
        });
    }

    #[test]
    fn from_params_routes_unknown_keys() {
        let loose: QueryParams = [
            ("width", ParamValue::Int(120)),
            ("sharp", ParamValue::Bool(true)),
        ]
        .into_iter()
        .collect();
        let t = ImageTransform::from_params(&loose);
        assert_eq!(t.descriptor.width, Some(120));
        assert_eq!(t.gumlet.get("sharp"), Some(&ParamValue::Bool(true)));
    }

    #[test]
    fn transform_deserializes_from_json() {
        let t: ImageTransform =
            serde_json::from_str(r#"{"width": 50, "format": "png", "gumlet": {"blur": 10}}"#)
                .unwrap();
        assert_eq!(t.descriptor.width, Some(50));
        assert_eq!(t.descriptor.format.as_deref(), Some("png"));
        assert_eq!(t.gumlet.get("blur"), Some(&ParamValue::Int(10)));
    }
}
