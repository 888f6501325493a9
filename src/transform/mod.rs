mod plays;
mod song;

pub use plays::{
    convert_events, time_breakdown, ConversionError, PlayRecord, UnresolvedPlay, PLAYBACK_PAGE,
};
pub use song::convert_song;
