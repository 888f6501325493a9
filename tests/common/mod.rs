//! Common test infrastructure
//!
//! This module provides the dataset builders and warehouse helpers used by
//! the end-to-end tests. Tests should only import from this module, not
//! from internal submodules.

mod constants;
mod fixtures;

// Public API - this is what tests import
pub use constants::*;
pub use fixtures::{
    anonymous_play_line, page_line, play_line, query_one, run_load, song_line, table_count,
    TestDataset,
};
