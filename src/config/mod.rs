mod file_config;

pub use file_config::FileConfig;

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_SONG_DATA_DIR: &str = "data/song_data";
pub const DEFAULT_LOG_DATA_DIR: &str = "data/log_data";

/// What to do when more than one catalog song matches a play's
/// (song, artist, duration) lookup key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum AmbiguousMatchPolicy {
    /// Keep the first matching pair and log the collision.
    #[default]
    UseFirst,
    /// Treat the collision as an error for the file being loaded.
    Fail,
}

/// What to do when a play with the same (start_time, user_id, session_id)
/// key is already in the warehouse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DuplicatePlayPolicy {
    /// Append anyway; reloading a log file duplicates its facts.
    #[default]
    Insert,
    /// Keep the stored row and drop the incoming one.
    Skip,
    /// Treat the duplicate as an error for the file being loaded.
    Fail,
}

/// CLI arguments that take part in config resolution. The optional fields
/// mirror what a TOML config file can override.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub warehouse_db: PathBuf,
    pub song_data: Option<PathBuf>,
    pub log_data: Option<PathBuf>,
    pub on_ambiguous_match: AmbiguousMatchPolicy,
    pub on_duplicate_play: DuplicatePlayPolicy,
    pub keep_going: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub warehouse_db: PathBuf,
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    pub on_ambiguous_match: AmbiguousMatchPolicy,
    pub on_duplicate_play: DuplicatePlayPolicy,
    pub keep_going: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file
    /// config. TOML values override CLI values where present.
    ///
    /// Data roots are not checked for existence here; the file enumerator
    /// reports a missing root against the resolved path.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let song_data = file
            .song_data
            .map(PathBuf::from)
            .or_else(|| cli.song_data.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SONG_DATA_DIR));

        let log_data = file
            .log_data
            .map(PathBuf::from)
            .or_else(|| cli.log_data.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DATA_DIR));

        let on_ambiguous_match = match file.on_ambiguous_match {
            Some(value) => parse_policy(&value, "on_ambiguous_match")?,
            None => cli.on_ambiguous_match,
        };

        let on_duplicate_play = match file.on_duplicate_play {
            Some(value) => parse_policy(&value, "on_duplicate_play")?,
            None => cli.on_duplicate_play,
        };

        let keep_going = file.keep_going.unwrap_or(cli.keep_going);

        Ok(Self {
            warehouse_db: cli.warehouse_db.clone(),
            song_data,
            log_data,
            on_ambiguous_match,
            on_duplicate_play,
            keep_going,
        })
    }
}

/// Parses a policy string from the TOML config using clap's ValueEnum trait,
/// so config files accept the same spellings as the CLI.
fn parse_policy<T: ValueEnum>(value: &str, key: &str) -> Result<T> {
    T::from_str(value, true).map_err(|_| anyhow!("Invalid {} value: {:?}", key, value))
}
