//! `gumlet url` – rewrite one asset URL.

use anyhow::{Context, Result};
use gumlet_core::{build_url, GumletConfig, ParamValue, QueryParams, TransformDescriptor};

/// Build and print the Gumlet URL for `url`.
pub fn run_url(
    cfg: &GumletConfig,
    url: &str,
    descriptor: TransformDescriptor,
    params: Vec<(String, ParamValue)>,
    params_json: Option<&str>,
) -> Result<()> {
    let mut extra = match params_json {
        Some(json) => serde_json::from_str::<QueryParams>(json).context("parse --params-json")?,
        None => QueryParams::new(),
    };
    for (key, value) in params {
        extra.set(key, value);
    }

    let descriptor = (!descriptor.is_empty()).then_some(descriptor);
    println!("{}", build_url(url, descriptor.as_ref(), cfg, &extra));
    Ok(())
}
