//! Typed views of the two input file families.
//!
//! Both datasets are line-delimited JSON: song metadata files carry one
//! record describing a song and its artist, activity log files carry one
//! event per line. Fields the pipeline does not use are ignored.

use crate::error::{EtlError, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One song metadata record.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SongDocument {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
    pub artist_name: String,
    #[serde(default)]
    pub artist_location: Option<String>,
    #[serde(default)]
    pub artist_latitude: Option<f64>,
    #[serde(default)]
    pub artist_longitude: Option<f64>,
}

/// User identifier as it appears in the activity logs: either a string or
/// a bare number, with the empty string standing in for anonymous rows.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawUserId {
    Text(String),
    Number(i64),
}

impl RawUserId {
    /// Normalized form: None for anonymous rows, the decimal text otherwise.
    pub fn normalized(&self) -> Option<String> {
        match self {
            RawUserId::Text(text) if text.is_empty() => None,
            RawUserId::Text(text) => Some(text.clone()),
            RawUserId::Number(number) => Some(number.to_string()),
        }
    }
}

/// One activity log event. Rows for pages other than playback legitimately
/// carry nulls in most fields, so everything the pipeline derives from is
/// optional here and checked during shaping instead.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    pub ts: i64,
    #[serde(default)]
    pub user_id: Option<RawUserId>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    pub level: String,
    #[serde(default)]
    pub song: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub length: Option<f64>,
    pub session_id: i64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    pub page: String,
}

/// Reads the single record of a song metadata file. The dataset stores one
/// record per file; anything past the first non-empty line is ignored.
pub fn read_song_document(path: &Path) -> Result<SongDocument> {
    let reader = BufReader::new(File::open(path)?);
    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        return serde_json::from_str(&line).map_err(|err| EtlError::Malformed {
            path: path.to_path_buf(),
            message: format!("line {}: {}", line_index + 1, err),
        });
    }
    Err(EtlError::Malformed {
        path: path.to_path_buf(),
        message: "no records".to_string(),
    })
}

/// Reads every event of an activity log file, one JSON document per line.
/// Empty lines are skipped, any undecodable line fails the whole file.
pub fn read_log_events(path: &Path) -> Result<Vec<LogEvent>> {
    let reader = BufReader::new(File::open(path)?);
    let mut events = Vec::new();
    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: LogEvent = serde_json::from_str(&line).map_err(|err| EtlError::Malformed {
            path: path.to_path_buf(),
            message: format!("line {}: {}", line_index + 1, err),
        })?;
        events.push(event);
    }
    Ok(events)
}
