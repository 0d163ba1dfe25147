//! The organize format engine: turns a format such as
//! `%albumartist/%album/{%track }%title` and a [`Song`] into a relative path.
//!
//! Text inside `{...}` is optional: when any tag directly inside a block
//! resolves empty, the whole block contributes nothing. Bare tags outside a
//! block are substituted as-is, empty or not.

pub mod parser;
pub mod tags;
pub mod validator;

use crate::errors::FormatError;
use crate::models::{complete_base_name, complete_suffix, OrganizedPath, Song};
use crate::sanitize::{self, OrganizeOptions};
use parser::Node;
use tags::Tag;
use tracing::debug;

pub use parser::{classify, Token, TokenKind};
pub use tags::{tag_value, KNOWN_TAGS};

/// Format string with tags substituted, before any path cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    /// A title or track number resolved to something non-empty.
    pub unique: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizeFormat {
    format: String,
    options: OrganizeOptions,
}

impl Default for OrganizeFormat {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_FORMAT)
    }
}

impl OrganizeFormat {
    pub fn new(format: impl Into<String>) -> Self {
        Self { format: format.into(), options: OrganizeOptions::default() }
    }

    pub fn with_options(mut self, options: OrganizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Replace the format. Backslashes are treated as directory separators.
    pub fn set_format(&mut self, format: &str) {
        self.format = format.replace('\\', "/");
    }

    pub fn options(&self) -> &OrganizeOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: OrganizeOptions) {
        self.options = options;
    }

    pub fn set_remove_problematic(&mut self, v: bool) {
        self.options.remove_problematic = v;
    }

    pub fn set_remove_non_fat(&mut self, v: bool) {
        self.options.remove_non_fat = v;
    }

    pub fn set_remove_non_ascii(&mut self, v: bool) {
        self.options.remove_non_ascii = v;
    }

    pub fn set_allow_extended_ascii(&mut self, v: bool) {
        self.options.allow_extended_ascii = v;
    }

    pub fn set_replace_spaces(&mut self, v: bool) {
        self.options.replace_spaces = v;
    }

    pub fn validate(&self) -> Result<(), FormatError> {
        validator::validate(&self.format).map_err(FormatError::from)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Highlighting spans for the current format.
    pub fn classify(&self) -> Vec<Token> {
        parser::classify(&self.format)
    }

    /// Substitute every tag and collapse empty blocks.
    pub fn substitute(&self, song: &Song) -> Substitution {
        let mut unique = false;
        let (text, _) = self.resolve(&parser::parse(&self.format), song, &mut unique);
        Substitution { text, unique }
    }

    /// Returns the resolved text and whether any tag at this level came out empty.
    fn resolve(&self, nodes: &[Node<'_>], song: &Song, unique: &mut bool) -> (String, bool) {
        let mut out = String::new();
        let mut any_empty = false;
        for node in nodes {
            match node {
                Node::Literal { text, .. } => out.push_str(text),
                Node::Tag { name, .. } => {
                    let value = tag_value(name, song, self.options.remove_problematic);
                    if value.is_empty() {
                        any_empty = true;
                    } else if Tag::from_name(name).is_some_and(Tag::is_unique) {
                        *unique = true;
                    }
                    out.push_str(&value);
                }
                Node::Block { children, .. } => {
                    let (value, empty) = self.resolve(children, song, unique);
                    if !empty {
                        out.push_str(&value);
                    }
                }
            }
        }
        (out, any_empty)
    }

    /// Compute the relative destination path for `song`.
    ///
    /// `extension` overrides the target extension (e.g. after transcoding);
    /// otherwise the resolved path's own suffix or the source file's is kept.
    pub fn compute_path(&self, song: &Song, extension: Option<&str>) -> Result<OrganizedPath, FormatError> {
        let Substitution { text, unique } = self.substitute(song);
        let mut filepath = if text.is_empty() { song.basefilename() } else { text };

        // Never produce a nameless file: keep the directory, reuse the source name.
        let (dir, name) = split_last(&filepath);
        if complete_base_name(name).is_empty() {
            filepath = match dir {
                Some(dir) => format!("{}/{}", dir, song.basefilename()),
                None => song.basefilename(),
            };
        }

        if filepath.is_empty() {
            return Err(FormatError::EmptyResult);
        }
        if let (Some(""), _) = split_last(&filepath) {
            return Err(FormatError::MalformedPath(filepath));
        }

        let cleaned = sanitize::apply_pipeline(&filepath, &self.options);

        let (dir, name) = split_last(&cleaned);
        let extension = match extension.filter(|e| !e.is_empty()) {
            Some(ext) => ext.to_string(),
            None => match complete_suffix(name) {
                "" => song.source_complete_suffix(),
                suffix => suffix.to_string(),
            },
        };

        let mut path = String::with_capacity(cleaned.len() + extension.len() + 1);
        if let Some(dir) = dir.filter(|d| !d.is_empty() && *d != ".") {
            path.push_str(dir);
            path.push('/');
        }
        path.push_str(complete_base_name(name));

        let mut path = sanitize::strip_invalid_prefixes(&path);
        if self.options.replace_spaces {
            path = sanitize::replace_spaces(&path);
        }
        if !extension.is_empty() {
            path.push('.');
            path.push_str(&extension);
        }

        debug!(source = %song.source.display(), path = %path, unique, "computed organize path");
        Ok(OrganizedPath { path, unique })
    }
}

/// Split at the last `/` into (directory, file name).
fn split_last(path: &str) -> (Option<&str>, &str) {
    match path.rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, path),
    }
}
