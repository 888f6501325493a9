//! Conversion of activity log events into warehouse rows.

use crate::records::{LogEvent, RawUserId};
use crate::warehouse::{TimeRow, UserRow};
use chrono::{Datelike, TimeZone, Timelike, Utc};
use thiserror::Error;

/// Page value marking a playback event; events for every other page are
/// dropped without producing rows.
pub const PLAYBACK_PAGE: &str = "NextSong";

/// Errors that can occur while converting log events.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Playback event at ts {ts} (session {session_id}) has no {field}")]
    MissingField {
        ts: i64,
        session_id: i64,
        field: &'static str,
    },

    #[error("Timestamp {ts} is outside the representable range")]
    TimestampOutOfRange { ts: i64 },
}

/// Warehouse rows derived from one playback event. The fact row does not
/// carry catalog ids yet; the (song, artist, length) lookup key travels
/// with it so the load stage can resolve them.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayRecord {
    pub time: TimeRow,
    pub user: UserRow,
    pub play: UnresolvedPlay,
}

/// Fact row fields plus the catalog lookup key.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedPlay {
    pub start_time: i64,
    pub user_id: String,
    pub level: String,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    pub song: String,
    pub artist: String,
    pub length: f64,
}

/// Keeps the playback events of a log and converts each one, preserving
/// input order. A playback event missing a required field fails the whole
/// batch; non-playback events are never an error.
pub fn convert_events(events: Vec<LogEvent>) -> Result<Vec<PlayRecord>, ConversionError> {
    events
        .into_iter()
        .filter(|event| event.page == PLAYBACK_PAGE)
        .map(convert_event)
        .collect()
}

fn convert_event(event: LogEvent) -> Result<PlayRecord, ConversionError> {
    let ts = event.ts;
    let session_id = event.session_id;
    let missing = |field| ConversionError::MissingField {
        ts,
        session_id,
        field,
    };

    let time = time_breakdown(ts).ok_or(ConversionError::TimestampOutOfRange { ts })?;

    let user_id = event
        .user_id
        .as_ref()
        .and_then(RawUserId::normalized)
        .ok_or_else(|| missing("userId"))?;
    let first_name = event.first_name.ok_or_else(|| missing("firstName"))?;
    let last_name = event.last_name.ok_or_else(|| missing("lastName"))?;
    let song = event.song.ok_or_else(|| missing("song"))?;
    let artist = event.artist.ok_or_else(|| missing("artist"))?;
    let length = event.length.ok_or_else(|| missing("length"))?;

    let user = UserRow {
        user_id: user_id.clone(),
        first_name,
        last_name,
        gender: event.gender,
        level: event.level.clone(),
    };

    let play = UnresolvedPlay {
        start_time: ts,
        user_id,
        level: event.level,
        session_id,
        location: event.location,
        user_agent: event.user_agent,
        song,
        artist,
        length,
    };

    Ok(PlayRecord { time, user, play })
}

/// Calendar breakdown of an epoch-millisecond timestamp, in UTC. Returns
/// None when the value cannot be represented as a datetime.
pub fn time_breakdown(start_time: i64) -> Option<TimeRow> {
    let datetime = Utc.timestamp_millis_opt(start_time).single()?;
    Some(TimeRow {
        start_time,
        hour: datetime.hour(),
        day: datetime.day(),
        week: datetime.iso_week().week(),
        month: datetime.month(),
        year: datetime.year(),
        weekday: datetime.format("%A").to_string(),
    })
}
