//! Media kinds and batch input collection from directories and CSV files

use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The kind of media an endpoint analyzes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
    Voice,
    Music,
    Text,
}

impl MediaKind {
    /// File extensions collected for this kind when scanning a directory
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => &[
                "jpg", "jpeg", "png", "webp", "heic", "heif", "tiff", "gif", "bmp",
            ],
            MediaKind::Video => &["mp4", "mov", "avi", "mkv", "webm", "m4v"],
            MediaKind::Voice | MediaKind::Music => {
                &["mp3", "wav", "flac", "m4a", "ogg", "aac", "wma"]
            }
            MediaKind::Text => &["txt", "md"],
        }
    }

    /// Number of concurrent requests used by batches of this kind unless overridden
    pub fn default_concurrency(&self) -> usize {
        match self {
            MediaKind::Image => 5,
            MediaKind::Video => 2,
            MediaKind::Voice | MediaKind::Music => 3,
            MediaKind::Text => 10,
        }
    }

    /// Label used in human-readable output
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Image => "Image",
            MediaKind::Video => "Video",
            MediaKind::Voice => "Voice",
            MediaKind::Music => "Music",
            MediaKind::Text => "Text",
        }
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions().contains(&ext.as_str())
            })
            .unwrap_or(false)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_ascii_lowercase())
    }
}

/// Collect the files of `kind` found in `directory`, sorted by path
pub fn collect_from_dir(
    directory: &Path,
    kind: MediaKind,
    recursive: bool,
) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(Error::FileNotFound(format!(
            "Directory not found: {}",
            directory.display()
        )));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(directory).min_depth(1).max_depth(max_depth) {
        let entry = entry.map_err(|e| Error::IOError(e.into()))?;
        if entry.file_type().is_file() && kind.matches(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Collect file paths from column `key` of a CSV file, optionally relative to `base_directory`
pub fn collect_from_csv(
    csv_path: &Path,
    key: &str,
    base_directory: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    if !csv_path.exists() {
        return Err(Error::FileNotFound(csv_path.display().to_string()));
    }

    let mut reader = csv::Reader::from_path(csv_path).map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?.clone();
    let column = headers.iter().position(|header| header == key).ok_or_else(|| {
        let available: Vec<&str> = headers.iter().collect();
        Error::InvalidRequest(format!(
            "CSV column '{key}' not found. Available: {available:?}"
        ))
    })?;

    let mut files = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let Some(value) = record.get(column) else {
            continue;
        };
        if value.trim().is_empty() {
            continue;
        }
        let path = match base_directory {
            Some(base) => base.join(value),
            None => PathBuf::from(value),
        };
        files.push(path);
    }

    Ok(files)
}

fn csv_error(error: csv::Error) -> Error {
    if error.is_io_error() {
        match error.into_kind() {
            csv::ErrorKind::Io(io_error) => Error::IOError(io_error),
            other => Error::InvalidRequest(format!("Invalid CSV: {other:?}")),
        }
    } else {
        Error::InvalidRequest(format!("Invalid CSV: {error}"))
    }
}
