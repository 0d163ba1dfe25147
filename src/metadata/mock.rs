use super::MetadataReader;
use crate::models::Song;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Serves canned songs keyed by file name. Used in tests and dry runs
/// over files that carry no real tags.
#[derive(Debug, Default, Clone)]
pub struct MockReader {
    songs: HashMap<String, Song>,
}

impl MockReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `song` for every file whose name equals `file_name`.
    pub fn with_song(mut self, file_name: &str, song: Song) -> Self {
        self.songs.insert(file_name.to_string(), song);
        self
    }
}

impl MetadataReader for MockReader {
    fn read(&self, path: &Path) -> Result<Song> {
        let name = path.file_name().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        info!("MockReader: read {}", name);
        let mut song = self
            .songs
            .get(&name)
            .cloned()
            .ok_or_else(|| anyhow!("no metadata for {}", path.display()))?;
        song.source = PathBuf::from(path);
        Ok(song)
    }
}
