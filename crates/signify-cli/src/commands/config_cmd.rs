//! `signify config` -- display resolved configuration.
//!
//! Shows the full resolved configuration (file, defaults and environment
//! overrides applied) as formatted JSON, a single section, or the path the
//! discovery chain picked.
//!
//! # Examples
//!
//! ```text
//! signify config
//! signify config playback
//! signify config --path
//! ```

use std::path::Path;

use anyhow::bail;
use clap::Args;

use signify_core::config_loader::{ProcessEnv, discover_config_path};
use signify_types::Config;

/// Arguments for `signify config`.
#[derive(Args)]
pub struct ConfigArgs {
    /// Show only this section (server, data, playback, display, client).
    pub section: Option<String>,

    /// Print the discovered config file path instead of its contents.
    #[arg(long)]
    pub path: bool,
}

pub fn run(args: &ConfigArgs, config: &Config, explicit: Option<&Path>) -> anyhow::Result<()> {
    if args.path {
        let cwd = std::env::current_dir().ok();
        let home = dirs::home_dir();
        match discover_config_path(explicit, &ProcessEnv, cwd.as_deref(), home.as_deref()) {
            Some(path) => println!("{}", path.display()),
            None => println!("(defaults, no config file found)"),
        }
        return Ok(());
    }

    println!("{}", render(config, args.section.as_deref())?);
    Ok(())
}

/// The whole config, or one top-level section, as pretty JSON.
fn render(config: &Config, section: Option<&str>) -> anyhow::Result<String> {
    let value = serde_json::to_value(config)?;
    let Some(section) = section else {
        return Ok(serde_json::to_string_pretty(&value)?);
    };
    match value.get(section) {
        Some(v) => Ok(serde_json::to_string_pretty(v)?),
        None => {
            let available: Vec<&str> = value
                .as_object()
                .map(|m| m.keys().map(|k| k.as_str()).collect())
                .unwrap_or_default();
            bail!(
                "unknown section '{section}' (available: {})",
                available.join(", ")
            );
        }
    }
}
