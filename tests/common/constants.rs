//! Shared constants for end-to-end tests
//!
//! This module contains all ids and metadata the dataset builders write.
//! When test data changes, update only this file.

// ============================================================================
// Catalog ids and metadata
// ============================================================================

/// Song id for "Glass Harbor"
pub const SONG_1_ID: &str = "SOGLSHB12A8C136EA1";

/// Song id for "Northern Line"
pub const SONG_2_ID: &str = "SONRTHL12AB017F3D2";

/// Song id for the second "Glass Harbor" recording (ambiguity twin)
pub const SONG_3_ID: &str = "SOGLSHB12AB018B544";

/// Artist id for "The Driftwood Parade"
pub const ARTIST_1_ID: &str = "ARDRFTW1187FB4E2C3";

/// Artist id for "Mabel Quinn"
pub const ARTIST_2_ID: &str = "ARMBLQN11E2835F8B7";

/// Artist id for the second "The Driftwood Parade" entry (ambiguity twin)
pub const ARTIST_3_ID: &str = "ARDWPRD1242B8A91D5";

/// Song 1 title
pub const SONG_1_TITLE: &str = "Glass Harbor";

/// Song 2 title
pub const SONG_2_TITLE: &str = "Northern Line";

/// Artist 1 name
pub const ARTIST_1_NAME: &str = "The Driftwood Parade";

/// Artist 2 name
pub const ARTIST_2_NAME: &str = "Mabel Quinn";

/// Song 1 duration in seconds
pub const SONG_1_DURATION: f64 = 221.12934;

/// Song 2 duration in seconds
pub const SONG_2_DURATION: f64 = 187.45424;

// ============================================================================
// Log event ids and metadata
// ============================================================================

/// User id of the first synthetic listener (Wyatt Fraser)
pub const USER_1_ID: &str = "39";

/// User id of the second synthetic listener (Maeve Okafor)
pub const USER_2_ID: &str = "8";

/// Session id used for user 1's events
pub const SESSION_1_ID: i64 = 583;

/// Session id used for user 2's events
pub const SESSION_2_ID: i64 = 139;

/// Timestamp of the first play: 2018-11-01T21:11:13.796Z, a Thursday in
/// ISO week 44. Later fixture events offset from this value.
pub const TS_FIRST_PLAY: i64 = 1541106673796;
