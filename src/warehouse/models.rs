//! Row types of the star schema.
//!
//! One struct per table, fields in column order. These are storage models:
//! they hold exactly what gets bound into the insert statements.

/// Song dimension row
#[derive(Clone, Debug, PartialEq)]
pub struct SongRow {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
}

/// Artist dimension row
#[derive(Clone, Debug, PartialEq)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Time dimension row: the calendar breakdown of one play timestamp.
/// `start_time` is epoch milliseconds in UTC, the rest is derived from it.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeRow {
    pub start_time: i64,
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    pub weekday: String,
}

/// User dimension row. `level` holds the subscription tier as of the most
/// recently loaded event for that user.
#[derive(Clone, Debug, PartialEq)]
pub struct UserRow {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub level: String,
}

/// Songplay fact row, fully resolved and ready for insertion. The catalog
/// ids stay None when the played song is not in the songs/artists tables.
#[derive(Clone, Debug, PartialEq)]
pub struct Songplay {
    pub start_time: i64,
    pub user_id: String,
    pub level: String,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

/// Row counts per table, for the end-of-run summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub songs: usize,
    pub artists: usize,
    pub time: usize,
    pub users: usize,
    pub songplays: usize,
}
