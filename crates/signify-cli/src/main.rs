//! `signify` -- CLI binary for the sign-language overlay backend.
//!
//! Provides the following subcommands:
//!
//! - `signify serve` -- Run the HTTP API and media server.
//! - `signify resolve` -- Resolve caption text into a sign sequence.
//! - `signify play` -- Resolve and play a caption through the playback controller.
//! - `signify config` -- Show the resolved configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

/// Sign-language overlay backend.
#[derive(Parser)]
#[command(name = "signify", about = "Sign-language overlay backend", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API and media server.
    Serve(commands::serve::ServeArgs),

    /// Resolve caption text into a sign sequence.
    Resolve(commands::resolve::ResolveArgs),

    /// Resolve a caption and play it through the playback controller.
    Play(commands::play::PlayArgs),

    /// Show the resolved configuration.
    Config(commands::config_cmd::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args, config).await?,
        Commands::Resolve(args) => commands::resolve::run(args, config).await?,
        Commands::Play(args) => commands::play::run(args, config).await?,
        Commands::Config(args) => commands::config_cmd::run(&args, &config, cli.config.as_deref())?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_without_error() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_has_all_subcommands() {
        let cmd = Cli::command();
        let sub_names: Vec<&str> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        assert_eq!(sub_names, vec!["serve", "resolve", "play", "config"]);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["signify", "serve", "-v", "--config", "/tmp/s.json"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/s.json")));
        assert!(matches!(cli.command, Commands::Serve(_)));
    }

    #[test]
    fn resolve_takes_free_text_and_words() {
        let cli = Cli::try_parse_from(["signify", "resolve", "hello", "there", "--words", "thank,you"]).unwrap();
        let Commands::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.text, vec!["hello", "there"]);
        assert_eq!(args.words, vec!["thank", "you"]);
    }

    #[test]
    fn play_requires_text() {
        assert!(Cli::try_parse_from(["signify", "play"]).is_err());
    }
}
