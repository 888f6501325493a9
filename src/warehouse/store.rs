//! SQLite-backed warehouse store.
//!
//! `Warehouse` owns the connection and hands out one `WarehouseTx` per input
//! file; every row touched while loading a file goes through that handle and
//! becomes visible only on `commit`. Dropping the handle without committing
//! rolls the file back.

use super::models::{ArtistRow, SongRow, Songplay, TableCounts, TimeRow, UserRow};
use super::schema::WAREHOUSE_SCHEMA;
use crate::error::Result;
use crate::sqlite_persistence::Schema;
use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::Path;
use tracing::info;

pub struct Warehouse {
    conn: Connection,
}

impl Warehouse {
    /// Opens the warehouse database at `path`, creating the schema when the
    /// database is empty and validating it otherwise.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open warehouse database {}", path.display()))?;
        Self::prepare(conn)
    }

    fn prepare(conn: Connection) -> anyhow::Result<Self> {
        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )?;

        if table_count == 0 {
            info!(
                "Creating warehouse schema at version {}",
                WAREHOUSE_SCHEMA.version
            );
            WAREHOUSE_SCHEMA.create(&conn)?;
        } else {
            let stamped = Schema::stamped_version(&conn)?;
            WAREHOUSE_SCHEMA.validate(&conn).with_context(|| {
                format!(
                    "Existing database is not a usable warehouse (stamped version: {:?})",
                    stamped
                )
            })?;
        }

        Ok(Self { conn })
    }

    /// Begins the transaction covering one input file.
    pub fn transaction(&mut self) -> Result<WarehouseTx<'_>> {
        Ok(WarehouseTx {
            tx: self.conn.transaction()?,
        })
    }

    /// Row counts of every table, for the end-of-run summary.
    pub fn table_counts(&self) -> Result<TableCounts> {
        let count = |table: &str| -> Result<usize> {
            let n: i64 =
                self.conn
                    .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
            Ok(n as usize)
        };
        Ok(TableCounts {
            songs: count("songs")?,
            artists: count("artists")?,
            time: count("time")?,
            users: count("users")?,
            songplays: count("songplays")?,
        })
    }
}

/// Write handle scoped to one input file.
pub struct WarehouseTx<'conn> {
    tx: Transaction<'conn>,
}

impl WarehouseTx<'_> {
    /// Inserts a song dimension row. Returns false when a row with the same
    /// song_id already exists; the stored row is left untouched.
    pub fn upsert_song(&self, song: &SongRow) -> Result<bool> {
        let changed = self.tx.execute(
            "INSERT INTO songs (song_id, title, artist_id, year, duration)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(song_id) DO NOTHING",
            params![
                song.song_id,
                song.title,
                song.artist_id,
                song.year,
                song.duration
            ],
        )?;
        Ok(changed > 0)
    }

    /// Inserts an artist dimension row, first write wins on artist_id.
    pub fn upsert_artist(&self, artist: &ArtistRow) -> Result<bool> {
        let changed = self.tx.execute(
            "INSERT INTO artists (artist_id, name, location, latitude, longitude)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(artist_id) DO NOTHING",
            params![
                artist.artist_id,
                artist.name,
                artist.location,
                artist.latitude,
                artist.longitude
            ],
        )?;
        Ok(changed > 0)
    }

    /// Inserts a time dimension row keyed by its timestamp. The breakdown is
    /// a pure function of the key, so an existing row is never rewritten.
    pub fn upsert_time(&self, time: &TimeRow) -> Result<bool> {
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO time (start_time, hour, day, week, month, year, weekday)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(start_time) DO NOTHING",
        )?;
        let changed = stmt.execute(params![
            time.start_time,
            time.hour,
            time.day,
            time.week,
            time.month,
            time.year,
            time.weekday
        ])?;
        Ok(changed > 0)
    }

    /// Inserts or refreshes a user dimension row. A returning user keeps one
    /// row; their subscription level is overwritten with the incoming value.
    pub fn upsert_user(&self, user: &UserRow) -> Result<()> {
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO users (user_id, first_name, last_name, gender, level)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id) DO UPDATE SET level = excluded.level",
        )?;
        stmt.execute(params![
            user.user_id,
            user.first_name,
            user.last_name,
            user.gender,
            user.level
        ])?;
        Ok(())
    }

    /// Looks up catalog (song_id, artist_id) pairs whose title, artist name
    /// and duration match a played song exactly. At most two rows come back;
    /// callers only distinguish none, one and more-than-one.
    pub fn matching_songs(
        &self,
        title: &str,
        artist: &str,
        duration: f64,
    ) -> Result<Vec<(String, String)>> {
        let mut stmt = self.tx.prepare_cached(
            "SELECT s.song_id, s.artist_id
             FROM songs s
             INNER JOIN artists a ON s.artist_id = a.artist_id
             WHERE s.title = ?1 AND a.name = ?2 AND s.duration = ?3
             LIMIT 2",
        )?;
        let pairs = stmt
            .query_map(params![title, artist, duration], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(pairs)
    }

    /// Returns whether a play with this natural key is already stored.
    pub fn play_exists(&self, start_time: i64, user_id: &str, session_id: i64) -> Result<bool> {
        let mut stmt = self.tx.prepare_cached(
            "SELECT 1 FROM songplays
             WHERE start_time = ?1 AND user_id = ?2 AND session_id = ?3
             LIMIT 1",
        )?;
        let found = stmt
            .query_row(params![start_time, user_id, session_id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    /// Appends a songplay fact row.
    pub fn insert_play(&self, play: &Songplay) -> Result<()> {
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO songplays
             (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        stmt.execute(params![
            play.start_time,
            play.user_id,
            play.level,
            play.song_id,
            play.artist_id,
            play.session_id,
            play.location,
            play.user_agent
        ])?;
        Ok(())
    }

    /// Makes the file's rows durable.
    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}
