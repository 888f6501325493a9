//! Warehouse Load Tool
//!
//! This binary loads a directory tree of song metadata files and activity
//! log files into a star-schema SQLite warehouse. Song files feed the song
//! and artist dimensions; activity logs feed the time and user dimensions
//! and the songplays fact table.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use playmart::config::{
    AmbiguousMatchPolicy, AppConfig, CliConfig, DuplicatePlayPolicy, FileConfig,
};
use playmart::runner;
use playmart::warehouse::Warehouse;

#[derive(Parser, Debug)]
#[command(name = "playmart")]
#[command(about = "Load song metadata and activity logs into a SQLite warehouse")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), "-", env!("GIT_HASH")))]
struct Args {
    /// Path to the SQLite warehouse database file
    #[arg(value_name = "WAREHOUSE_DB")]
    warehouse_db: PathBuf,

    /// Root directory of song metadata files
    #[arg(long, value_name = "DIR")]
    song_data: Option<PathBuf>,

    /// Root directory of activity log files
    #[arg(long, value_name = "DIR")]
    log_data: Option<PathBuf>,

    /// Path to a TOML config file; its values override CLI flags
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// What to do when several catalog songs match one play
    #[arg(long, value_enum, default_value = "use-first")]
    on_ambiguous_match: AmbiguousMatchPolicy,

    /// What to do when a play is already in the warehouse
    #[arg(long, value_enum, default_value = "insert")]
    on_duplicate_play: DuplicatePlayPolicy,

    /// Continue the run even if some files fail to load
    #[arg(long, default_value_t = false)]
    keep_going: bool,

    /// Delete the warehouse database file before loading
    #[arg(long, default_value_t = false)]
    recreate: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let file_config = match &args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };

    let cli = CliConfig {
        warehouse_db: args.warehouse_db,
        song_data: args.song_data,
        log_data: args.log_data,
        on_ambiguous_match: args.on_ambiguous_match,
        on_duplicate_play: args.on_duplicate_play,
        keep_going: args.keep_going,
    };
    let config = AppConfig::resolve(&cli, file_config)?;

    info!("Warehouse Load Tool");
    info!("===================");
    info!("Warehouse database: {}", config.warehouse_db.display());
    info!("Song data: {}", config.song_data.display());
    info!("Log data: {}", config.log_data.display());

    if args.recreate && config.warehouse_db.exists() {
        info!("Removing existing warehouse database");
        std::fs::remove_file(&config.warehouse_db).with_context(|| {
            format!(
                "Failed to remove warehouse database: {:?}",
                config.warehouse_db
            )
        })?;
    }

    let mut warehouse = Warehouse::open(&config.warehouse_db)?;

    info!("Starting load...");
    let stats = runner::run(&config, &mut warehouse)?;

    // Print summary
    info!("");
    info!("Load Summary");
    info!("============");
    info!("Song files loaded: {}", stats.song_files);
    info!("Log files loaded: {}", stats.log_files);
    info!("New songs: {}", stats.songs_loaded);
    info!("New artists: {}", stats.artists_loaded);
    info!("Plays loaded: {}", stats.plays_loaded);
    info!("Plays matched to the catalog: {}", stats.plays_resolved);
    if stats.duplicate_plays_skipped > 0 {
        info!("Duplicate plays skipped: {}", stats.duplicate_plays_skipped);
    }
    if stats.failed_files > 0 {
        warn!("Files failed: {}", stats.failed_files);
    }

    // Verify counts
    let counts = warehouse.table_counts()?;
    info!("");
    info!("Warehouse contains:");
    info!("  {} songs", counts.songs);
    info!("  {} artists", counts.artists);
    info!("  {} time rows", counts.time);
    info!("  {} users", counts.users);
    info!("  {} songplays", counts.songplays);

    if stats.failed_files > 0 {
        bail!("{} files failed to load", stats.failed_files);
    }

    info!("");
    info!("Load completed successfully!");

    Ok(())
}
