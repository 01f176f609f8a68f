use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::transform::SUPPORTED_FORMATS;

/// Environment variable holding the raw Gumlet domain.
pub const ENV_DOMAIN: &str = "GUMLET_DOMAIN";
/// Environment variable toggling the rewriter; only the literal `false` disables it.
pub const ENV_ENABLED: &str = "GUMLET_ENABLED";

/// Validation failure for a loaded configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("default_quality must be between 1 and 100, got {0}")]
    QualityOutOfRange(u32),
    #[error("default_format {0:?} is not one of: auto, webp, avif, jpg, png, gif, svg, ico, pdf")]
    UnknownFormat(String),
}

/// Global configuration loaded from `~/.config/gumlet/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GumletConfig {
    /// Gumlet delivery domain, e.g. `site.gumlet.io`. A scheme prefix and
    /// trailing slashes are tolerated. Unset or empty = rewriting is inert.
    pub domain: Option<String>,
    /// Master switch; when false every URL is passed through untouched.
    pub enabled: bool,
    /// Quality applied when neither the transform nor the caller sets `q`.
    pub default_quality: u32,
    /// Format applied when nothing sets `f`; `auto` leaves it to Gumlet.
    pub default_format: String,
    /// Let Gumlet negotiate the output format with the browser. Informational.
    pub auto_format: bool,
    /// Also emit `fit`/`crop` from the transform's mode and position.
    pub emit_geometry: bool,
}

impl Default for GumletConfig {
    fn default() -> Self {
        Self {
            domain: None,
            enabled: true,
            default_quality: 80,
            default_format: "auto".to_string(),
            auto_format: true,
            emit_geometry: false,
        }
    }
}

impl GumletConfig {
    /// Default configuration pointed at `domain`.
    pub fn for_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            ..Self::default()
        }
    }

    /// The configured domain with scheme and trailing slashes stripped
    /// (empty string when unset).
    pub fn normalized_domain(&self) -> String {
        self.domain
            .as_deref()
            .map(normalize_domain)
            .unwrap_or_default()
    }

    /// Applies `GUMLET_DOMAIN` / `GUMLET_ENABLED` from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_with(|name| std::env::var(name).ok());
    }

    /// Applies environment overrides using `lookup` to read variables.
    ///
    /// A non-empty `GUMLET_DOMAIN` replaces the domain. A set
    /// `GUMLET_ENABLED` enables the rewriter unless it is exactly `false`.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(domain) = lookup(ENV_DOMAIN).filter(|d| !d.is_empty()) {
            self.domain = Some(domain);
        }
        if let Some(enabled) = lookup(ENV_ENABLED) {
            self.enabled = enabled != "false";
        }
    }

    /// Checks value ranges. An empty `default_format` is accepted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.default_quality) {
            return Err(ConfigError::QualityOutOfRange(self.default_quality));
        }
        if !self.default_format.is_empty()
            && !SUPPORTED_FORMATS.contains(&self.default_format.as_str())
        {
            return Err(ConfigError::UnknownFormat(self.default_format.clone()));
        }
        Ok(())
    }
}

/// Strips a leading `http://` or `https://` and any trailing slashes.
pub fn normalize_domain(raw: &str) -> String {
    let without_scheme = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"))
        .unwrap_or(raw);
    without_scheme.trim_end_matches('/').to_string()
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gumlet")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
/// Environment overrides are applied and the result is validated.
pub fn load_or_init() -> Result<GumletConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = GumletConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return finish(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit file. Environment overrides are
/// applied and the result is validated.
pub fn load_from(path: &Path) -> Result<GumletConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: GumletConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    finish(cfg)
}

fn finish(mut cfg: GumletConfig) -> Result<GumletConfig> {
    cfg.apply_env_overrides();
    cfg.validate()?;
    Ok(cfg)
}
