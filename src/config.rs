use crate::format::OrganizeFormat;
use crate::sanitize::OrganizeOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_FORMAT: &str = "%albumartist/%album/{%track }%title";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_format")]
    pub format: String,

    pub source_folder: PathBuf,
    pub destination_folder: PathBuf,

    // Sanitization
    #[serde(default = "default_true")]
    pub remove_problematic: bool,
    #[serde(default)]
    pub remove_non_fat: bool,
    #[serde(default)]
    pub remove_non_ascii: bool,
    #[serde(default)]
    pub allow_extended_ascii: bool,
    #[serde(default = "default_true")]
    pub replace_spaces: bool,

    /// Target extension for every file; keep each file's own when unset.
    #[serde(default)]
    pub extension: Option<String>,

    /// Whitelist of file extensions to treat as track/media files.
    /// Examples: ["*.mp3", "*.flac", "wav"]. Case-insensitive.
    #[serde(default = "default_file_extensions")]
    pub file_extensions: Vec<String>,

    /// Copy instead of moving.
    #[serde(default)]
    pub copy: bool,
    #[serde(default)]
    pub overwrite: bool,

    /// Directory for the daily-rotated log file; stdout only when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_format() -> String { DEFAULT_FORMAT.into() }
fn default_true() -> bool { true }

fn default_file_extensions() -> Vec<String> {
    vec![
        "*.mp3",
        "*.flac",
        "*.ogg",
        "*.opus",
        "*.m4a",
        "*.wav",
        "*.aiff",
        "*.wv",
        "*.ape",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Config {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&s)?;
        Ok(cfg)
    }

    /// `$XDG_CONFIG_HOME/music-file-organizer/config.toml` (or the platform equivalent).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("music-file-organizer").join("config.toml"))
    }

    pub fn options(&self) -> OrganizeOptions {
        OrganizeOptions {
            remove_problematic: self.remove_problematic,
            remove_non_fat: self.remove_non_fat,
            remove_non_ascii: self.remove_non_ascii,
            allow_extended_ascii: self.allow_extended_ascii,
            replace_spaces: self.replace_spaces,
        }
    }

    pub fn organize_format(&self) -> OrganizeFormat {
        let mut format = OrganizeFormat::default().with_options(self.options());
        format.set_format(&self.format);
        format
    }
}
