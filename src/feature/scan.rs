//! Directory scans over feature lists.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use super::{FeatureError, FeatureList};

/// Non-hidden regular files of `dir`, sorted by file name
pub fn sample_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, FeatureError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Intensities of every feature in every file of `dir`.
///
/// Stops at the first file that is not a readable feature list.
pub fn directory_intensities<P: AsRef<Path>>(dir: P) -> Result<Vec<f64>, FeatureError> {
    let files = sample_files(dir)?;
    let mut values = Vec::new();
    for path in &files {
        let list = FeatureList::from_path(path).map_err(|e| FeatureError::in_file(path, e))?;
        values.extend(list.intensities());
    }
    info!(
        "Collected {} intensities from {} files",
        values.len(),
        files.len()
    );
    Ok(values)
}
