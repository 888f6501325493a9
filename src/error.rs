//! Error type shared by the extract, transform and load stages.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EtlError>;

/// Errors that can occur during a load run.
#[derive(Debug, Error)]
pub enum EtlError {
    /// A data root handed to the file enumerator does not exist or is not
    /// a directory.
    #[error("Data directory not found: {}", .0.display())]
    MissingDataDir(PathBuf),

    /// A document that could not be decoded, or that lacks a field the
    /// pipeline cannot proceed without. The message names the line or
    /// event the problem was found at.
    #[error("Malformed document {}: {}", .path.display(), .message)]
    Malformed { path: PathBuf, message: String },

    /// More than one catalog entry matched a play's (song, artist, duration)
    /// key while the run was configured to treat that as fatal.
    #[error("Ambiguous catalog match for {title:?} by {artist:?} ({duration}s)")]
    AmbiguousSong {
        title: String,
        artist: String,
        duration: f64,
    },

    /// A play with the same natural key is already stored while the run was
    /// configured to treat that as fatal.
    #[error("Duplicate play: start_time {start_time}, user {user_id}, session {session_id}")]
    DuplicatePlay {
        start_time: i64,
        user_id: String,
        session_id: i64,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
