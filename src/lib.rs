//! Playmart Warehouse Loader Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod config;
pub mod error;
pub mod records;
pub mod runner;
pub mod scan;
pub mod sqlite_persistence;
pub mod transform;
pub mod warehouse;

// Re-export commonly used types for convenience
pub use config::{AmbiguousMatchPolicy, AppConfig, CliConfig, DuplicatePlayPolicy, FileConfig};
pub use error::EtlError;
pub use runner::RunStats;
pub use warehouse::Warehouse;
