//! Core library for music-file-organizer: format engine, sanitizer and library organizer.
pub mod config;
pub mod errors;
pub mod format;
pub mod metadata;
pub mod models;
pub mod organize;
pub mod sanitize;

pub use errors::{FormatError, StructuralError};
pub use format::OrganizeFormat;
pub use models::{OrganizedPath, Song};
pub use sanitize::OrganizeOptions;
