//! `gumlet config show|path`.

use anyhow::Result;
use gumlet_core::config::{self, GumletConfig};
use std::path::Path;

pub fn run_config_show(cfg: &GumletConfig) -> Result<()> {
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}

pub fn run_config_path(explicit: Option<&Path>) -> Result<()> {
    match explicit {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", config::config_path()?.display()),
    }
    Ok(())
}
