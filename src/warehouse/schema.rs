//! SQLite schema definitions for the songplay warehouse.
//!
//! A small star schema: one fact table (`songplays`) and four dimensions.
//! Dimension primary keys are the natural ids carried by the source data;
//! the fact table uses the implicit rowid as its surrogate key.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, Schema, SqlType, Table};

/// Song dimension, one row per catalog song.
const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("song_id", SqlType::Text, is_primary_key = true),
        sqlite_column!("title", SqlType::Text, non_null = true),
        sqlite_column!("artist_id", SqlType::Text, non_null = true),
        sqlite_column!("year", SqlType::Integer, non_null = true),
        sqlite_column!("duration", SqlType::Real, non_null = true),
    ],
    indices: &[("idx_songs_title", "title")],
};

/// Artist dimension. Coordinates and location are absent for many artists
/// in the source data, so those columns stay nullable.
const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("artist_id", SqlType::Text, is_primary_key = true),
        sqlite_column!("name", SqlType::Text, non_null = true),
        sqlite_column!("location", SqlType::Text),
        sqlite_column!("latitude", SqlType::Real),
        sqlite_column!("longitude", SqlType::Real),
    ],
    indices: &[("idx_artists_name", "name")],
};

/// Time dimension keyed by the epoch-millisecond timestamp itself.
const TIME_TABLE: Table = Table {
    name: "time",
    columns: &[
        sqlite_column!("start_time", SqlType::Integer, is_primary_key = true),
        sqlite_column!("hour", SqlType::Integer, non_null = true),
        sqlite_column!("day", SqlType::Integer, non_null = true),
        sqlite_column!("week", SqlType::Integer, non_null = true),
        sqlite_column!("month", SqlType::Integer, non_null = true),
        sqlite_column!("year", SqlType::Integer, non_null = true),
        sqlite_column!("weekday", SqlType::Text, non_null = true),
    ],
    indices: &[],
};

/// User dimension, one row per user, level kept current on conflict.
const USERS_TABLE: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("user_id", SqlType::Text, is_primary_key = true),
        sqlite_column!("first_name", SqlType::Text, non_null = true),
        sqlite_column!("last_name", SqlType::Text, non_null = true),
        sqlite_column!("gender", SqlType::Text),
        sqlite_column!("level", SqlType::Text, non_null = true),
    ],
    indices: &[],
};

/// Songplay fact table. `songplay_id` is a rowid alias, the catalog ids are
/// nullable because most played songs are not in the catalog subset.
const SONGPLAYS_TABLE: Table = Table {
    name: "songplays",
    columns: &[
        sqlite_column!("songplay_id", SqlType::Integer, is_primary_key = true),
        sqlite_column!("start_time", SqlType::Integer, non_null = true),
        sqlite_column!("user_id", SqlType::Text, non_null = true),
        sqlite_column!("level", SqlType::Text, non_null = true),
        sqlite_column!("song_id", SqlType::Text),
        sqlite_column!("artist_id", SqlType::Text),
        sqlite_column!("session_id", SqlType::Integer, non_null = true),
        sqlite_column!("location", SqlType::Text),
        sqlite_column!("user_agent", SqlType::Text),
    ],
    indices: &[
        ("idx_songplays_start_time", "start_time"),
        ("idx_songplays_user", "user_id"),
    ],
};

pub const WAREHOUSE_SCHEMA: Schema = Schema {
    version: 0,
    tables: &[
        SONGS_TABLE,
        ARTISTS_TABLE,
        TIME_TABLE,
        USERS_TABLE,
        SONGPLAYS_TABLE,
    ],
};
