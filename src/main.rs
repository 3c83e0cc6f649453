//! Beatscript CLI
//!
//! Command-line interface for the Beatscript analysis organizer.

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use beatscript::cli::{commands, Cli, Commands};
use beatscript::config::Config;
use beatscript::BeatscriptError;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Beatscript v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::resolve(cli.config.as_deref())?;

    match cli.command {
        Some(cmd) => handle_command(cmd, &config).map_err(|e| {
            error!("{} [{}]", e, e.error_code());
            for suggestion in e.recovery_suggestions() {
                error!("  - {}", suggestion);
            }
            anyhow::Error::new(e)
        }),
        None => {
            println!("Beatscript v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands, config: &Config) -> Result<(), BeatscriptError> {
    match cmd {
        Commands::Organize { input, output } => {
            commands::organize(&input, output.as_deref(), config).map(|_| ())
        }
        Commands::Summary { input } => commands::summary(&input, config),
        Commands::Plot { input, svg } => commands::plot(&input, svg.as_deref(), config).map(|_| ()),
        Commands::Analyze { track_id, source } => commands::analyze(&track_id, &source, config),
        Commands::Cache { prune, clear } => commands::cache(prune, clear, config),
    }
}
