//! CLI for building Gumlet CDN URLs.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use gumlet_core::config::{self, GumletConfig};
use gumlet_core::{parse_key_value, ParamValue, TransformDescriptor};
use std::path::{Path, PathBuf};

use commands::{run_completions, run_config_path, run_config_show, run_man, run_url};

/// Top-level CLI for the Gumlet URL builder.
#[derive(Debug, Parser)]
#[command(name = "gumlet")]
#[command(about = "Rewrite image URLs onto the Gumlet image CDN", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/gumlet/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Rewrite an asset URL onto the Gumlet domain and print it.
    Url {
        /// Original asset URL.
        url: String,

        #[command(flatten)]
        transform: TransformArgs,

        /// Extra Gumlet parameter, repeatable (e.g. --param dpr=2). Overrides derived values.
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        params: Vec<(String, ParamValue)>,

        /// Extra Gumlet parameters as a JSON object. --param entries win over these.
        #[arg(long, value_name = "JSON")]
        params_json: Option<String>,
    },

    /// Show the effective configuration or where it lives.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration (file + environment) as TOML.
    Show,
    /// Print the config file path.
    Path,
}

/// Transform options for `gumlet url`.
#[derive(Debug, Clone, Default, Args)]
pub struct TransformArgs {
    /// Target width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Target height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Output quality (1-100).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub quality: Option<u32>,

    /// Output format (auto, webp, avif, jpg/jpeg, png, gif, svg, ico, pdf).
    #[arg(long)]
    pub format: Option<String>,

    /// Resize mode (crop, fit, stretch, letterbox).
    #[arg(long)]
    pub mode: Option<String>,

    /// Focal position, e.g. top-left or center-center.
    #[arg(long)]
    pub position: Option<String>,
}

impl From<TransformArgs> for TransformDescriptor {
    fn from(args: TransformArgs) -> Self {
        TransformDescriptor {
            width: args.width,
            height: args.height,
            quality: args.quality,
            format: args.format,
            mode: args.mode,
            position: args.position,
        }
    }
}

fn load_config(explicit: Option<&Path>) -> Result<GumletConfig> {
    let cfg = match explicit {
        Some(path) => config::load_from(path)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let explicit = cli.config.as_deref();

        match cli.command {
            CliCommand::Url {
                url,
                transform,
                params,
                params_json,
            } => {
                let cfg = load_config(explicit)?;
                run_url(&cfg, &url, transform.into(), params, params_json.as_deref())?;
            }
            CliCommand::Config { action } => match action {
                ConfigAction::Show => run_config_show(&load_config(explicit)?)?,
                ConfigAction::Path => run_config_path(explicit)?,
            },
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
