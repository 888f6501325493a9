//! Conversion of song metadata documents into dimension rows.

use crate::records::SongDocument;
use crate::warehouse::{ArtistRow, SongRow};

/// Splits one song document into its song and artist dimension rows. Field
/// values are carried over verbatim; cross-file duplicates are left to the
/// store's first-write-wins conflict handling.
pub fn convert_song(doc: SongDocument) -> (SongRow, ArtistRow) {
    let song = SongRow {
        song_id: doc.song_id,
        title: doc.title,
        artist_id: doc.artist_id.clone(),
        year: doc.year,
        duration: doc.duration,
    };
    let artist = ArtistRow {
        artist_id: doc.artist_id,
        name: doc.artist_name,
        location: doc.artist_location,
        latitude: doc.artist_latitude,
        longitude: doc.artist_longitude,
    };
    (song, artist)
}
