use clap::{Parser, Subcommand};
use log::info;

use lessonsync::audit;
use lessonsync::config;
use lessonsync::curriculum;

/// Batch pipeline for LRC lesson content: parse timestamped transcripts
/// into lesson JSON and keep the curriculum manifest in sync.
#[derive(Parser, Debug)]
#[command(name = "lessonsync", version, about)]
struct Cli {
    /// Path to the TOML configuration file (optional).
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse all LRC files, synchronize lesson JSON, rebuild the
    /// curriculum lesson listings.
    Sync,
    /// Report lessons whose word-analysis coverage is below 90%.
    Audit,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = config::load_config_from_file(&cli.config).map_err(anyhow::Error::msg)?;

    match cli.command {
        Command::Sync => {
            let stats = curriculum::run_sync(&config)?;
            info!(
                "Sync finished: {} lessons ({} created, {} updated, {} unchanged, {} skipped), curriculum {}",
                stats.lessons_seen,
                stats.created,
                stats.updated,
                stats.unchanged,
                stats.skipped,
                if stats.curriculum_written { "written" } else { "unchanged" }
            );
        }
        Command::Audit => {
            let gaps = audit::run_audit(&config)?;
            println!("{}", serde_json::to_string_pretty(&gaps)?);
        }
    }

    Ok(())
}
