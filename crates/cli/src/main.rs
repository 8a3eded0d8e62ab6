//! SimScene CLI — the main entry point.
//!
//! Commands:
//! - `convert` — Convert every source database into one scenario document
//! - `inspect` — Show the layout of a single source database
//! - `config`  — Show, validate or create the configuration file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "simscene",
    about = "SimScene — intersection trajectory databases to simulator scenarios",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (default: ./simscene.toml)
    #[arg(short, long, global = true, env = "SIMSCENE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert source databases into a scenario document
    Convert {
        /// Directory scanned for source databases
        #[arg(short, long)]
        input_dir: Option<PathBuf>,

        /// Output JSON file (overwritten)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of files read at the same time
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Also write the batch report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Show tables, trajectory table and track counts of one database
    Inspect {
        /// Source database file
        path: PathBuf,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Validate the configuration file
    Validate,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Convert {
            input_dir,
            output,
            jobs,
            report,
        } => {
            let args = commands::convert::ConvertArgs {
                input_dir,
                output,
                jobs,
                report,
            };
            commands::convert::run(config, args).await?
        }
        Commands::Inspect { path } => commands::inspect::run(config, &path).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show(config).await?,
            ConfigAction::Path => commands::config_cmd::path(config).await?,
            ConfigAction::Validate => commands::config_cmd::validate(config).await?,
            ConfigAction::Init { force } => commands::config_cmd::init(config, force).await?,
        },
    }

    Ok(())
}
