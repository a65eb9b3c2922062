//! Source discovery on disk.

use super::provider::BarSource;
use std::io;
use std::path::{Path, PathBuf};

/// List every `*.csv` file directly inside `dir`, sorted by file name.
///
/// The extension match is case-insensitive. Subdirectories are not walked.
pub fn discover_sources(dir: impl AsRef<Path>) -> io::Result<Vec<BarSource>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths.into_iter().map(BarSource::from_path).collect())
}

/// Expand a mix of files and directories into sources.
///
/// Directories contribute their CSV files; anything else is taken as an
/// explicit file path, whatever its extension.
pub fn resolve_sources<P: AsRef<Path>>(inputs: &[P]) -> io::Result<Vec<BarSource>> {
    let mut sources = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if input.is_dir() {
            sources.extend(discover_sources(input)?);
        } else {
            sources.push(BarSource::from_path(input));
        }
    }
    Ok(sources)
}
