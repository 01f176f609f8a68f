//! CLI command handlers, one file per command.

mod completions;
mod config;
mod url;

pub use completions::{run_completions, run_man};
pub use config::{run_config_path, run_config_show};
pub use url::run_url;
