//! Recursive discovery of input files under a data root.

use crate::error::{EtlError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collects every `.json` file under `root` at any depth, as absolute paths
/// in lexicographic order. The order makes progress reporting and failure
/// positions reproducible across runs.
///
/// A missing or non-directory root is an error; an existing root with no
/// matching files yields an empty list.
pub fn json_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(EtlError::MissingDataDir(root.to_path_buf()));
    }
    let root = root.canonicalize()?;

    let mut files = Vec::new();
    for entry in WalkDir::new(&root) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "json")
        {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
