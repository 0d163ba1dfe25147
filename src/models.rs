use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Nanoseconds per second; `Song::length_nanos` is stored in this unit.
pub const NSEC_PER_SEC: i64 = 1_000_000_000;

/// Read-only metadata record for one media file.
///
/// Fields are `None` when the tag is missing. Numeric fields also treat
/// `0` and `-1` as unset (see [`Song::present`]), which is the convention the
/// tag readers use for "no value".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub source: PathBuf,
    pub title: Option<String>,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    pub composer: Option<String>,
    pub performer: Option<String>,
    pub grouping: Option<String>,
    pub lyrics: Option<String>,
    pub genre: Option<String>,
    pub comment: Option<String>,
    pub year: Option<i32>,
    pub original_year: Option<i32>,
    pub track: Option<i32>,
    pub disc: Option<i32>,
    pub length_nanos: Option<i64>,
    pub bitrate: Option<i32>,
    pub samplerate: Option<i32>,
    pub bitdepth: Option<i32>,
    #[serde(default)]
    pub compilation: bool,
}

impl Song {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self { source: source.into(), ..Default::default() }
    }

    /// Filter a numeric field down to a real value: `0` and `-1` mean unset.
    pub fn present<T>(value: Option<T>) -> Option<T>
    where
        T: Copy + PartialEq + From<i8>,
    {
        value.filter(|v| *v != T::from(0) && *v != T::from(-1))
    }

    /// Album artist if set, otherwise the track artist.
    pub fn effective_albumartist(&self) -> Option<&str> {
        non_blank(self.album_artist.as_deref()).or_else(|| non_blank(self.artist.as_deref()))
    }

    /// Original release year if set, otherwise the release year.
    pub fn effective_originalyear(&self) -> Option<i32> {
        Self::present(self.original_year).or_else(|| Self::present(self.year))
    }

    /// Whole seconds of playback; `None` for tracks shorter than a second.
    pub fn length_seconds(&self) -> Option<i64> {
        Self::present(self.length_nanos.map(|n| n / NSEC_PER_SEC))
    }

    /// File name of the source, extension included.
    pub fn basefilename(&self) -> String {
        self.source
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Directory holding the source file, empty when there is none.
    pub fn directory(&self) -> String {
        self.source
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Last suffix of the source file name ("flac" for "a.tar.flac").
    pub fn source_extension(&self) -> String {
        self.basefilename()
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_string())
            .unwrap_or_default()
    }

    /// Everything after the first dot of the source file name ("tar.flac" for "a.tar.flac").
    pub fn source_complete_suffix(&self) -> String {
        complete_suffix(&self.basefilename()).to_string()
    }
}

/// Outcome of a successful `compute_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizedPath {
    pub path: String,
    /// True when a title or track number made it into the path.
    pub unique: bool,
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

/// Part of a file name after its first dot.
pub(crate) fn complete_suffix(file_name: &str) -> &str {
    file_name.split_once('.').map(|(_, rest)| rest).unwrap_or("")
}

/// Part of a file name before its last dot.
pub(crate) fn complete_base_name(file_name: &str) -> &str {
    file_name.rsplit_once('.').map(|(base, _)| base).unwrap_or(file_name)
}
