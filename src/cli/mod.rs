//! CLI Module
//!
//! Command-line interface for organizing analyses and plotting funscripts.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Beatscript - structure track analyses and plot haptic timelines
#[derive(Parser, Debug)]
#[command(name = "beatscript")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Nest bars and beats under their sections
    #[command(name = "organize")]
    Organize {
        /// Audio analysis JSON
        input: PathBuf,

        /// Write the structured analysis here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print one line per section with its bar and beat counts
    #[command(name = "summary")]
    Summary {
        /// Audio analysis JSON
        input: PathBuf,
    },

    /// Show the plot scales for a funscript
    #[command(name = "plot")]
    Plot {
        /// Funscript JSON
        input: PathBuf,

        /// Also render the timeline as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Fetch (or load from cache) and organize a track's analysis
    #[command(name = "analyze")]
    Analyze {
        /// Track id
        track_id: String,

        /// Directory holding `<id>.analysis.json` and `<id>.features.json`
        #[arg(short, long)]
        source: PathBuf,
    },

    /// Show cache usage, optionally pruning stray files
    #[command(name = "cache")]
    Cache {
        /// Delete files the cache manifest does not track
        #[arg(long)]
        prune: bool,

        /// Delete every cached payload
        #[arg(long, conflicts_with = "prune")]
        clear: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_flags() {
        let cli = Cli::try_parse_from(["beatscript", "cache", "--prune"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Cache {
                prune: true,
                clear: false
            })
        ));

        let err = Cli::try_parse_from(["beatscript", "cache", "--prune", "--clear"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
