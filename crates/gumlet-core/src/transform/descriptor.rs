//! Transform descriptor: the host's transform reduced to plain fields.

use serde::{Deserialize, Serialize};

use super::{map_format, map_mode, map_position};
use crate::params::{ParamValue, QueryParams};

/// One image transform as described by the host. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformDescriptor {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// 1–100.
    pub quality: Option<u32>,
    pub format: Option<String>,
    /// `crop`, `fit`, `stretch` or `letterbox`.
    pub mode: Option<String>,
    /// Compass position such as `top-left` or `center-center`.
    pub position: Option<String>,
}

impl TransformDescriptor {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Splits a loose parameter map into descriptor fields and leftovers.
    ///
    /// Keys naming a descriptor field are consumed; every other key is
    /// returned in the second map, in its original order, to be sent to
    /// Gumlet as-is. A descriptor key whose value can't be read as the
    /// field's type (e.g. `width = "wide"`) is dropped.
    pub fn from_params(params: &QueryParams) -> (Self, QueryParams) {
        let mut descriptor = Self::default();
        let mut rest = QueryParams::new();

        for (key, value) in params.iter() {
            match key {
                "width" => descriptor.width = dimension(key, value),
                "height" => descriptor.height = dimension(key, value),
                "quality" => descriptor.quality = dimension(key, value),
                "format" => descriptor.format = text(value),
                "mode" => descriptor.mode = text(value),
                "position" => descriptor.position = text(value),
                _ => rest.set(key, value.clone()),
            }
        }

        (descriptor, rest)
    }

    /// Gumlet parameters derived from this descriptor.
    ///
    /// `w`, `h` and `q` are emitted only for non-zero values; `f` goes
    /// through [`map_format`]. With `emit_geometry`, a present `mode` adds
    /// `fit` and a present `position` adds `crop`.
    pub fn to_params(&self, emit_geometry: bool) -> QueryParams {
        let mut params = QueryParams::new();

        if let Some(w) = self.width.filter(|&w| w > 0) {
            params.set("w", w);
        }
        if let Some(h) = self.height.filter(|&h| h > 0) {
            params.set("h", h);
        }
        if let Some(q) = self.quality.filter(|&q| q > 0) {
            params.set("q", q);
        }
        if let Some(f) = self.format.as_deref().and_then(map_format) {
            params.set("f", f);
        }

        if emit_geometry {
            if let Some(mode) = self.mode.as_deref().filter(|m| !m.is_empty()) {
                params.set("fit", map_mode(Some(mode)));
            }
            if let Some(position) = self.position.as_deref().filter(|p| !p.is_empty()) {
                params.set("crop", map_position(Some(position)));
            }
        }

        params
    }
}

fn dimension(key: &str, value: &ParamValue) -> Option<u32> {
    let parsed = match value {
        ParamValue::Int(n) => u32::try_from(*n).ok(),
        ParamValue::Float(x) if *x >= 0.0 && *x <= f64::from(u32::MAX) => Some(*x as u32),
        ParamValue::Str(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    if parsed.is_none() && !value.is_blank() {
        tracing::debug!(key, value = %value, "ignoring unreadable transform dimension");
    }
    parsed
}

fn text(value: &ParamValue) -> Option<String> {
    if value.is_blank() {
        None
    } else {
        Some(value.to_string())
    }
}
