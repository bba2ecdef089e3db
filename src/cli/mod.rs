//! CLI module for lingo.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// lingo - sort a music library by language
///
/// Detects the language of every track from its metadata, falls back to
/// lyrics for the tracks metadata cannot settle, and builds one playlist
/// per language.
#[derive(Parser, Debug)]
#[command(name = "lingo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "LINGO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Label every catalog track from its name, artist and album
    Detect {
        /// Catalog export (defaults to the data directory's catalog)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Scored output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve unknown tracks from their lyrics (resumable)
    Augment {
        /// Scored tracks from `lingo detect`
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Augmented output, doubling as the resume checkpoint
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create one playlist per language
    Playlists {
        /// Comma-separated language codes (e.g. "fra,spa"), or "all"
        languages: String,

        /// Augmented tracks from `lingo augment`
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Skip languages with fewer tracks than this
        #[arg(long)]
        min_size: Option<usize>,

        /// Print the groups without creating anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Run detect, augment and playlists in sequence
    Run {
        /// Comma-separated language codes (e.g. "fra,spa"), or "all"
        languages: String,

        /// Catalog export (defaults to the data directory's catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Skip languages with fewer tracks than this
        #[arg(long)]
        min_size: Option<usize>,
    },

    /// Show the language distribution of any stage's output
    Summary {
        /// Track file to summarize
        file: PathBuf,
    },

    /// Check tokens, data directory and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show effective configuration
    Show,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_playlists() {
        let cli = Cli::parse_from(["lingo", "-vv", "playlists", "fra,spa", "--min-size", "5", "--dry-run"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Playlists {
                languages,
                min_size,
                dry_run,
                input,
            } => {
                assert_eq!(languages, "fra,spa");
                assert_eq!(min_size, Some(5));
                assert!(dry_run);
                assert!(input.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_config_path() {
        let cli = Cli::parse_from(["lingo", "--config", "/tmp/lingo.toml", "config", "path"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/lingo.toml")));
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Path
            }
        ));
    }
}
