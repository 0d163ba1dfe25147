pub mod lofty_reader;
pub mod mock;

use crate::models::Song;
use anyhow::Result;
use std::path::Path;

/// Source of song metadata for a file on disk.
/// Implementations: lofty_reader::LoftyReader, mock::MockReader.
pub trait MetadataReader: Send + Sync {
    /// Read the metadata record for `path`. The returned song's `source` is `path`.
    fn read(&self, path: &Path) -> Result<Song>;
}

/// Parse the leading decimal digits of a tag value ("3/12" -> 3, "1979-11-30" -> 1979).
pub(crate) fn leading_number(value: &str) -> Option<i32> {
    let trimmed = value.trim();
    let end = trimmed.find(|c: char| !c.is_ascii_digit()).unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}
