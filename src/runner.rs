//! One-shot load run.
//!
//! Enumerates the two data roots in a fixed order (song metadata first,
//! since activity logs are resolved against the song catalog), converts
//! each file and loads it inside its own transaction. A file either
//! commits whole or leaves no trace.

use crate::config::{AmbiguousMatchPolicy, AppConfig, DuplicatePlayPolicy};
use crate::error::{EtlError, Result};
use crate::records;
use crate::scan;
use crate::transform::{self, UnresolvedPlay};
use crate::warehouse::{Songplay, Warehouse, WarehouseTx};
use std::path::Path;
use tracing::{error, info, warn};

/// Counters accumulated over a whole run. Dimension counters track rows
/// actually inserted, not rows offered; an upsert that hits an existing
/// key does not move them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub song_files: usize,
    pub log_files: usize,
    pub failed_files: usize,
    pub songs_loaded: usize,
    pub artists_loaded: usize,
    pub plays_loaded: usize,
    pub plays_resolved: usize,
    pub duplicate_plays_skipped: usize,
}

/// Runs the whole load against an open warehouse.
pub fn run(config: &AppConfig, warehouse: &mut Warehouse) -> Result<RunStats> {
    let mut stats = RunStats::default();

    info!("Loading song metadata from {}", config.song_data.display());
    process_directory(
        warehouse,
        &config.song_data,
        config.keep_going,
        &mut stats,
        |tx, path, stats| load_song_file(tx, path, stats),
    )?;

    info!("Loading activity logs from {}", config.log_data.display());
    process_directory(
        warehouse,
        &config.log_data,
        config.keep_going,
        &mut stats,
        |tx, path, stats| load_log_file(tx, path, config, stats),
    )?;

    Ok(stats)
}

/// Walks one data root and feeds every file to `load_file` under its own
/// transaction. The first failure aborts the run unless `keep_going` is
/// set, in which case the file is rolled back, counted and skipped.
fn process_directory<F>(
    warehouse: &mut Warehouse,
    root: &Path,
    keep_going: bool,
    stats: &mut RunStats,
    mut load_file: F,
) -> Result<()>
where
    F: FnMut(&WarehouseTx<'_>, &Path, &mut RunStats) -> Result<()>,
{
    let files = scan::json_files(root)?;
    info!("{} files found in {}", files.len(), root.display());

    for (index, path) in files.iter().enumerate() {
        let tx = warehouse.transaction()?;
        let loaded = load_file(&tx, path, stats).and_then(|()| tx.commit());
        match loaded {
            Ok(()) => {
                info!("{}/{} files processed.", index + 1, files.len());
            }
            Err(err) => {
                error!("Failed to load {}: {}", path.display(), err);
                stats.failed_files += 1;
                if !keep_going {
                    return Err(err);
                }
            }
        }
    }
    Ok(())
}

fn load_song_file(tx: &WarehouseTx<'_>, path: &Path, stats: &mut RunStats) -> Result<()> {
    let doc = records::read_song_document(path)?;
    let (song, artist) = transform::convert_song(doc);

    if tx.upsert_song(&song)? {
        stats.songs_loaded += 1;
    }
    if tx.upsert_artist(&artist)? {
        stats.artists_loaded += 1;
    }
    stats.song_files += 1;
    Ok(())
}

fn load_log_file(
    tx: &WarehouseTx<'_>,
    path: &Path,
    config: &AppConfig,
    stats: &mut RunStats,
) -> Result<()> {
    let events = records::read_log_events(path)?;
    let records = transform::convert_events(events).map_err(|err| EtlError::Malformed {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    for record in records {
        tx.upsert_time(&record.time)?;
        tx.upsert_user(&record.user)?;

        let play = record.play;
        let (song_id, artist_id) = resolve_catalog_ids(tx, &play, config.on_ambiguous_match)?;
        if song_id.is_some() {
            stats.plays_resolved += 1;
        }

        match config.on_duplicate_play {
            DuplicatePlayPolicy::Insert => {}
            DuplicatePlayPolicy::Skip => {
                if tx.play_exists(play.start_time, &play.user_id, play.session_id)? {
                    stats.duplicate_plays_skipped += 1;
                    continue;
                }
            }
            DuplicatePlayPolicy::Fail => {
                if tx.play_exists(play.start_time, &play.user_id, play.session_id)? {
                    return Err(EtlError::DuplicatePlay {
                        start_time: play.start_time,
                        user_id: play.user_id,
                        session_id: play.session_id,
                    });
                }
            }
        }

        tx.insert_play(&Songplay {
            start_time: play.start_time,
            user_id: play.user_id,
            level: play.level,
            song_id,
            artist_id,
            session_id: play.session_id,
            location: play.location,
            user_agent: play.user_agent,
        })?;
        stats.plays_loaded += 1;
    }

    stats.log_files += 1;
    Ok(())
}

/// Resolves a play against the song catalog. No match leaves both ids as
/// None; more than one match is handled per the configured policy.
fn resolve_catalog_ids(
    tx: &WarehouseTx<'_>,
    play: &UnresolvedPlay,
    policy: AmbiguousMatchPolicy,
) -> Result<(Option<String>, Option<String>)> {
    let matches = tx.matching_songs(&play.song, &play.artist, play.length)?;
    if matches.len() > 1 {
        match policy {
            AmbiguousMatchPolicy::UseFirst => {
                warn!(
                    "Multiple catalog songs match {:?} by {:?} ({}s), keeping the first",
                    play.song, play.artist, play.length
                );
            }
            AmbiguousMatchPolicy::Fail => {
                return Err(EtlError::AmbiguousSong {
                    title: play.song.clone(),
                    artist: play.artist.clone(),
                    duration: play.length,
                });
            }
        }
    }
    Ok(match matches.into_iter().next() {
        Some((song_id, artist_id)) => (Some(song_id), Some(artist_id)),
        None => (None, None),
    })
}
