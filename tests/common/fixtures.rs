//! Test fixture creation for datasets and warehouses
//!
//! Builds song metadata and activity log files shaped like the production
//! datasets inside a TempDir, and runs whole loads against them.

use super::constants::*;
use anyhow::Result;
use playmart::config::{AmbiguousMatchPolicy, AppConfig, DuplicatePlayPolicy};
use playmart::runner::{self, RunStats};
use playmart::warehouse::Warehouse;
use rusqlite::Connection;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Browser string shared by all synthetic log events. The production logs
/// store the value with its surrounding quotes, so the fixtures do too.
const USER_AGENT: &str = "\"Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_4) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/36.0.1985.143 Safari/537.36\"";

/// One on-disk dataset: a song_data/ tree, a log_data/ tree and a
/// warehouse database path, all inside a single TempDir.
pub struct TestDataset {
    pub dir: TempDir,
}

impl TestDataset {
    /// Creates empty data trees with the nesting the production datasets
    /// use (song files two levels deep, log files under year/month).
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join("song_data/A/A"))?;
        fs::create_dir_all(dir.path().join("log_data/2018/11"))?;
        Ok(Self { dir })
    }

    pub fn song_data(&self) -> PathBuf {
        self.dir.path().join("song_data")
    }

    pub fn log_data(&self) -> PathBuf {
        self.dir.path().join("log_data")
    }

    pub fn warehouse_db(&self) -> PathBuf {
        self.dir.path().join("warehouse.db")
    }

    /// Config pointing at this dataset with default policies.
    pub fn config(&self) -> AppConfig {
        AppConfig {
            warehouse_db: self.warehouse_db(),
            song_data: self.song_data(),
            log_data: self.log_data(),
            on_ambiguous_match: AmbiguousMatchPolicy::UseFirst,
            on_duplicate_play: DuplicatePlayPolicy::Insert,
            keep_going: false,
        }
    }

    /// Writes one song metadata file. Files land in the same directory, so
    /// names control processing order.
    pub fn write_song_file(&self, name: &str, line: &str) -> Result<PathBuf> {
        let path = self.song_data().join("A/A").join(name);
        fs::write(&path, format!("{}\n", line))?;
        Ok(path)
    }

    /// Writes one activity log file, one event per line.
    pub fn write_log_file(&self, name: &str, lines: &[String]) -> Result<PathBuf> {
        let path = self.log_data().join("2018/11").join(name);
        fs::write(&path, format!("{}\n", lines.join("\n")))?;
        Ok(path)
    }

    /// Writes the standard two-song catalog.
    pub fn write_catalog(&self) -> Result<()> {
        self.write_song_file(
            "TRAAGHB128F425A3C2.json",
            &song_line(
                SONG_1_ID,
                SONG_1_TITLE,
                ARTIST_1_ID,
                ARTIST_1_NAME,
                SONG_1_DURATION,
            ),
        )?;
        self.write_song_file(
            "TRABNRL128F9312A55.json",
            &song_line(
                SONG_2_ID,
                SONG_2_TITLE,
                ARTIST_2_ID,
                ARTIST_2_NAME,
                SONG_2_DURATION,
            ),
        )?;
        Ok(())
    }

    /// Adds a second catalog entry sharing song 1's title, artist name and
    /// duration but with its own ids.
    pub fn write_catalog_twin(&self) -> Result<()> {
        self.write_song_file(
            "TRACTWN128F93A0D21.json",
            &song_line(
                SONG_3_ID,
                SONG_1_TITLE,
                ARTIST_3_ID,
                ARTIST_1_NAME,
                SONG_1_DURATION,
            ),
        )?;
        Ok(())
    }
}

/// One song metadata record in the dataset's on-disk shape.
pub fn song_line(
    song_id: &str,
    title: &str,
    artist_id: &str,
    artist_name: &str,
    duration: f64,
) -> String {
    json!({
        "num_songs": 1,
        "artist_id": artist_id,
        "artist_latitude": null,
        "artist_longitude": null,
        "artist_location": "",
        "artist_name": artist_name,
        "song_id": song_id,
        "title": title,
        "duration": duration,
        "year": 0
    })
    .to_string()
}

/// One playback (NextSong) event line for a known listener.
pub fn play_line(
    ts: i64,
    user_id: &str,
    level: &str,
    song: &str,
    artist: &str,
    length: f64,
    session_id: i64,
) -> String {
    let (first_name, last_name, gender, location) = identity(user_id);
    json!({
        "artist": artist,
        "auth": "Logged In",
        "firstName": first_name,
        "gender": gender,
        "itemInSession": 1,
        "lastName": last_name,
        "length": length,
        "level": level,
        "location": location,
        "method": "PUT",
        "page": "NextSong",
        "registration": 1540919166796.0,
        "sessionId": session_id,
        "song": song,
        "status": 200,
        "ts": ts,
        "userAgent": USER_AGENT,
        "userId": user_id
    })
    .to_string()
}

/// One non-playback event line; pages other than NextSong carry nulls in
/// the song fields.
pub fn page_line(ts: i64, user_id: &str, page: &str, session_id: i64) -> String {
    let (first_name, last_name, gender, location) = identity(user_id);
    json!({
        "artist": null,
        "auth": "Logged In",
        "firstName": first_name,
        "gender": gender,
        "itemInSession": 0,
        "lastName": last_name,
        "length": null,
        "level": "free",
        "location": location,
        "method": "GET",
        "page": page,
        "registration": 1540919166796.0,
        "sessionId": session_id,
        "song": null,
        "status": 200,
        "ts": ts,
        "userAgent": USER_AGENT,
        "userId": user_id
    })
    .to_string()
}

/// A playback event from a logged-out session: empty userId, no name.
pub fn anonymous_play_line(ts: i64, session_id: i64) -> String {
    json!({
        "artist": "Some Band",
        "auth": "Logged Out",
        "firstName": null,
        "gender": null,
        "itemInSession": 0,
        "lastName": null,
        "length": 201.0,
        "level": "free",
        "location": null,
        "method": "PUT",
        "page": "NextSong",
        "registration": null,
        "sessionId": session_id,
        "song": "Some Song",
        "status": 200,
        "ts": ts,
        "userAgent": null,
        "userId": ""
    })
    .to_string()
}

fn identity(user_id: &str) -> (&'static str, &'static str, &'static str, &'static str) {
    match user_id {
        USER_1_ID => ("Wyatt", "Fraser", "M", "Portland-South Portland, ME"),
        USER_2_ID => ("Maeve", "Okafor", "F", "Chicago-Naperville-Elgin, IL-IN-WI"),
        _ => ("Alex", "Doe", "M", "Red Bluff, CA"),
    }
}

/// Opens the warehouse and runs a full load with the given config.
pub fn run_load(config: &AppConfig) -> Result<RunStats> {
    let mut warehouse = Warehouse::open(&config.warehouse_db)?;
    Ok(runner::run(config, &mut warehouse)?)
}

/// Runs one scalar query against the warehouse database.
pub fn query_one<T, P>(db: &Path, sql: &str, params: P) -> T
where
    T: rusqlite::types::FromSql,
    P: rusqlite::Params,
{
    let conn = Connection::open(db).unwrap();
    conn.query_row(sql, params, |row| row.get(0)).unwrap()
}

/// Row count of one warehouse table.
pub fn table_count(db: &Path, table: &str) -> i64 {
    query_one(db, &format!("SELECT COUNT(*) FROM {}", table), [])
}
