//! Text sanitization used when turning a resolved format into a path.
//!
//! Every function here is pure and knows nothing about the format grammar.
//! [`apply_pipeline`] runs the character-level stages in their fixed order;
//! the path-level stages ([`strip_invalid_prefixes`], [`replace_spaces`]) run
//! later, once the extension has been split off.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::char::{compose, decompose_compatible};

/// Characters that break on common filesystems.
pub const PROBLEMATIC_CHARACTERS: &[char] = &[':', '?', '*', '"', '<', '>', '|'];

/// Path separators, never allowed inside a single tag value.
pub const INVALID_DIR_CHARACTERS: &[char] = &['/', '\\'];

/// A path segment starting with one of these loses that first character.
pub const INVALID_PREFIX_CHARACTERS: &[char] = &['.'];

/// Punctuation allowed in FAT short/long names, besides ASCII letters and digits.
const FAT_PUNCTUATION: &str = "!#$%&'()-@^_`{}~/. ";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").expect("valid whitespace regex"));

/// Flags controlling the sanitization stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizeOptions {
    pub remove_problematic: bool,
    pub remove_non_fat: bool,
    pub remove_non_ascii: bool,
    pub allow_extended_ascii: bool,
    pub replace_spaces: bool,
}

impl Default for OrganizeOptions {
    fn default() -> Self {
        Self {
            remove_problematic: false,
            remove_non_fat: false,
            remove_non_ascii: false,
            allow_extended_ascii: false,
            replace_spaces: true,
        }
    }
}

impl OrganizeOptions {
    fn needs_transliteration(&self) -> bool {
        self.remove_non_fat || (self.remove_non_ascii && !self.allow_extended_ascii)
    }

    fn ascii_ceiling(&self) -> u32 {
        if self.allow_extended_ascii {
            255
        } else {
            128
        }
    }
}

pub fn remove_problematic(s: &str) -> String {
    s.chars().filter(|c| !PROBLEMATIC_CHARACTERS.contains(c)).collect()
}

/// Fold accented and non-latin characters to their closest ASCII spelling.
/// Characters with no known spelling are dropped.
pub fn transliterate(s: &str) -> String {
    deunicode::deunicode_with_tofu(s, "")
}

pub fn is_fat_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || FAT_PUNCTUATION.contains(c)
}

pub fn remove_non_fat(s: &str) -> String {
    s.chars().filter(|c| is_fat_safe(*c)).collect()
}

/// First character of a single decomposition step of `c`
/// (`ǖ` gives `ü`, not `u`). `None` when `c` does not decompose.
fn decomposition_head(c: char) -> Option<char> {
    let mut parts = Vec::new();
    decompose_compatible(c, |d| parts.push(d));
    if parts.len() < 2 {
        return parts.first().copied().filter(|&d| d != c);
    }
    // the last step only peeled off the trailing mark; rebuild what came before it
    parts.pop();
    let head = parts[0];
    Some(parts[1..].iter().try_fold(head, |acc, &m| compose(acc, m)).unwrap_or(head))
}

/// Keep characters below `ceiling`; otherwise keep the first character of
/// their decomposition when that one fits, else drop them.
pub fn fold_to_ascii(s: &str, ceiling: u32) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if (c as u32) < ceiling {
            out.push(c);
            continue;
        }
        if let Some(base) = decomposition_head(c) {
            if (base as u32) < ceiling {
                out.push(base);
            }
        }
    }
    out
}

/// Collapse whitespace runs to a single space and trim both ends.
pub fn simplify(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop one leading invalid-prefix character from each `/` segment, then trim it.
pub fn strip_invalid_prefixes(path: &str) -> String {
    path.split('/')
        .map(|part| {
            let part = match part.chars().next() {
                Some(c) if INVALID_PREFIX_CHARACTERS.contains(&c) => &part[c.len_utf8()..],
                _ => part,
            };
            part.trim()
        })
        .collect::<Vec<_>>()
        .join("/")
}

pub fn replace_spaces(s: &str) -> String {
    WHITESPACE.replace_all(s, "_").into_owned()
}

/// Strip what a single tag value must never contribute to a path.
pub fn clean_tag_value(value: &str, remove_dots: bool) -> String {
    let mut cleaned: String = value.chars().filter(|c| !INVALID_DIR_CHARACTERS.contains(c)).collect();
    if remove_dots {
        cleaned.retain(|c| c != '.');
    }
    cleaned.trim().to_string()
}

/// Character-level stages, applied to the whole assembled path.
pub fn apply_pipeline(s: &str, options: &OrganizeOptions) -> String {
    let mut out = s.to_string();
    if options.remove_problematic {
        out = remove_problematic(&out);
    }
    if options.needs_transliteration() {
        out = transliterate(&out);
    }
    if options.remove_non_fat {
        out = remove_non_fat(&out);
    }
    if options.remove_non_ascii {
        out = fold_to_ascii(&out, options.ascii_ceiling());
    }
    simplify(&out)
}
