pub mod apply;
pub mod clean;
pub mod sanitize;

pub use apply::{apply, ApplyArgs};
pub use clean::{clean, CleanArgs};
pub use sanitize::{sanitize, SanitizeArgs};

use crate::config::Config;
use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expand a file or directory argument into markup files
pub(crate) fn collect_inputs(input: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        Ok(vec![input.to_path_buf()])
    } else if input.is_dir() {
        Ok(find_markup_files(input, config))
    } else {
        Err(anyhow::anyhow!("Input path does not exist: {}", input.display()))
    }
}

fn find_markup_files(dir: &Path, config: &Config) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && config.is_markup_file(path))
        .collect();
    files.sort();
    files
}
