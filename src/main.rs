use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wellplan::cli::{
    handle_config, handle_export, handle_inspect, handle_restore, handle_status, ExportArgs,
    RestoreArgs,
};
use wellplan::config::{paths::WellplanPaths, settings::Settings};
use wellplan::store::JsonFileStore;

#[derive(Parser)]
#[command(
    name = "wellplan",
    version,
    about = "Passphrase-protected backup and restore for your wellbeing plan",
    long_about = "wellplan exports your installed wellbeing plan, profile and check-in \
                  history into a single encrypted file, and restores it on any device. \
                  Set WELLPLAN_PASSPHRASE to skip the passphrase prompt."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an encrypted backup of your plan
    #[command(alias = "backup")]
    Export(ExportArgs),

    /// Restore your plan from a backup file
    Restore(RestoreArgs),

    /// Show what a backup file is without decrypting it
    Inspect {
        /// Backup file (.wbap or .json)
        file: PathBuf,
    },

    /// Show what is stored on this device
    Status,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("WELLPLAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = WellplanPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let store = JsonFileStore::new(paths.records_file());

    match cli.command {
        Some(Commands::Export(args)) => handle_export(&paths, &settings, &store, args)?,
        Some(Commands::Restore(args)) => {
            paths.ensure_directories()?;
            handle_restore(&store, args)?;
        }
        Some(Commands::Inspect { file }) => handle_inspect(&file)?,
        Some(Commands::Status) => handle_status(&store)?,
        Some(Commands::Config) => handle_config(&paths, &settings)?,
        None => {
            println!("wellplan - encrypted wellbeing plan backups");
            println!();
            println!("Run 'wellplan --help' for usage information.");
        }
    }

    Ok(())
}
