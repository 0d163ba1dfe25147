use crate::models::Song;
use crate::sanitize;
use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_THE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^the\s+").expect("valid regex"));

/// Album artist substituted for compilations.
pub const VARIOUS_ARTISTS: &str = "Various Artists";

/// Placeholders understood by the format engine (`%title`, `%track`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Title,
    Album,
    Artist,
    ArtistInitial,
    AlbumArtist,
    Composer,
    Track,
    Disc,
    Year,
    OriginalYear,
    Genre,
    Comment,
    Length,
    Bitrate,
    Samplerate,
    Bitdepth,
    Extension,
    Performer,
    Grouping,
    Lyrics,
}

/// Every known tag, in the order they are documented to users.
pub const KNOWN_TAGS: &[Tag] = &[
    Tag::Title,
    Tag::Album,
    Tag::Artist,
    Tag::ArtistInitial,
    Tag::AlbumArtist,
    Tag::Composer,
    Tag::Track,
    Tag::Disc,
    Tag::Year,
    Tag::OriginalYear,
    Tag::Genre,
    Tag::Comment,
    Tag::Length,
    Tag::Bitrate,
    Tag::Samplerate,
    Tag::Bitdepth,
    Tag::Extension,
    Tag::Performer,
    Tag::Grouping,
    Tag::Lyrics,
];

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::Title => "title",
            Tag::Album => "album",
            Tag::Artist => "artist",
            Tag::ArtistInitial => "artistinitial",
            Tag::AlbumArtist => "albumartist",
            Tag::Composer => "composer",
            Tag::Track => "track",
            Tag::Disc => "disc",
            Tag::Year => "year",
            Tag::OriginalYear => "originalyear",
            Tag::Genre => "genre",
            Tag::Comment => "comment",
            Tag::Length => "length",
            Tag::Bitrate => "bitrate",
            Tag::Samplerate => "samplerate",
            Tag::Bitdepth => "bitdepth",
            Tag::Extension => "extension",
            Tag::Performer => "performer",
            Tag::Grouping => "grouping",
            Tag::Lyrics => "lyrics",
        }
    }

    /// Case-sensitive lookup; `%Title` is not a known tag.
    pub fn from_name(name: &str) -> Option<Tag> {
        KNOWN_TAGS.iter().copied().find(|t| t.name() == name)
    }

    /// Tags whose presence makes a path tell songs apart.
    pub fn is_unique(self) -> bool {
        matches!(self, Tag::Title | Tag::Track)
    }

    /// Raw value for this tag, before path cleanup. Empty when the field is unset.
    fn raw_value(self, song: &Song) -> String {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let number = |v: Option<i32>| Song::present(v).map(|n| n.to_string()).unwrap_or_default();

        match self {
            Tag::Title => text(&song.title),
            Tag::Album => text(&song.album),
            Tag::Artist => text(&song.artist),
            Tag::Composer => text(&song.composer),
            Tag::Performer => text(&song.performer),
            Tag::Grouping => text(&song.grouping),
            Tag::Lyrics => text(&song.lyrics),
            Tag::Genre => text(&song.genre),
            Tag::Comment => text(&song.comment),
            Tag::Year => number(song.year),
            Tag::OriginalYear => song.effective_originalyear().map(|n| n.to_string()).unwrap_or_default(),
            Tag::Track => {
                let track = number(song.track);
                if track.len() == 1 {
                    format!("0{track}")
                } else {
                    track
                }
            }
            Tag::Disc => number(song.disc),
            Tag::Length => song.length_seconds().map(|n| n.to_string()).unwrap_or_default(),
            Tag::Bitrate => number(song.bitrate),
            Tag::Samplerate => number(song.samplerate),
            Tag::Bitdepth => number(song.bitdepth),
            Tag::Extension => song.source_extension(),
            Tag::ArtistInitial => artist_initial(song.effective_albumartist().unwrap_or("")),
            Tag::AlbumArtist => {
                if song.compilation {
                    VARIOUS_ARTISTS.to_string()
                } else {
                    song.effective_albumartist().unwrap_or("").to_string()
                }
            }
        }
    }
}

/// First letter of an artist name, upper-cased, ignoring a leading "The ".
fn artist_initial(artist: &str) -> String {
    let trimmed = artist.trim();
    let stripped = LEADING_THE.replace(trimmed, "");
    stripped.chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default()
}

/// Resolve `%name` for one song: the field value, cleaned so it cannot add
/// path separators. Unknown names resolve to an empty string.
pub fn tag_value(name: &str, song: &Song, remove_problematic: bool) -> String {
    match Tag::from_name(name) {
        Some(tag) => {
            let raw = tag.raw_value(song);
            if is_unset(&raw) {
                return String::new();
            }
            sanitize::clean_tag_value(&raw, remove_problematic)
        }
        None => String::new(),
    }
}

/// Tag writers store "0" or "-1" for a field they never filled, text fields included.
fn is_unset(value: &str) -> bool {
    value == "0" || value == "-1"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NSEC_PER_SEC;

    fn song() -> Song {
        let mut s = Song::new("/music/in/Track 01.flac");
        s.title = Some("Comfortably Numb".into());
        s.artist = Some("Pink Floyd".into());
        s
    }

    #[test]
    fn every_known_tag_round_trips_by_name() {
        for tag in KNOWN_TAGS {
            assert_eq!(Tag::from_name(tag.name()), Some(*tag));
        }
        assert_eq!(KNOWN_TAGS.len(), 20);
        assert_eq!(Tag::from_name("Title"), None);
        assert_eq!(Tag::from_name(""), None);
    }

    #[test]
    fn track_pads_single_digits_only() {
        let mut s = song();
        s.track = Some(7);
        assert_eq!(tag_value("track", &s, false), "07");
        s.track = Some(12);
        assert_eq!(tag_value("track", &s, false), "12");
        s.track = Some(0);
        assert_eq!(tag_value("track", &s, false), "");
    }

    #[test]
    fn numbers_treat_sentinels_as_unset() {
        let mut s = song();
        s.disc = Some(-1);
        s.year = Some(0);
        s.bitrate = Some(320);
        assert_eq!(tag_value("disc", &s, false), "");
        assert_eq!(tag_value("year", &s, false), "");
        assert_eq!(tag_value("bitrate", &s, false), "320");
    }

    #[test]
    fn text_fields_treat_sentinels_as_unset() {
        let mut s = song();
        s.title = Some("0".into());
        s.album = Some("-1".into());
        s.artist = Some("0".into());
        assert_eq!(tag_value("title", &s, false), "");
        assert_eq!(tag_value("album", &s, false), "");
        assert_eq!(tag_value("artistinitial", &s, false), "");
        s.title = Some("00".into());
        assert_eq!(tag_value("title", &s, false), "00");
    }

    #[test]
    fn length_is_in_seconds() {
        let mut s = song();
        s.length_nanos = Some(382 * NSEC_PER_SEC + 12);
        assert_eq!(tag_value("length", &s, false), "382");
    }

    #[test]
    fn artist_initial_skips_the() {
        let mut s = song();
        s.album_artist = Some("  the Beatles".into());
        assert_eq!(tag_value("artistinitial", &s, false), "B");
        s.album_artist = None;
        s.artist = Some("Theory of a Deadman".into());
        assert_eq!(tag_value("artistinitial", &s, false), "T");
        s.artist = None;
        assert_eq!(tag_value("artistinitial", &s, false), "");
    }

    #[test]
    fn compilations_use_various_artists() {
        let mut s = song();
        s.album_artist = Some("Someone".into());
        assert_eq!(tag_value("albumartist", &s, false), "Someone");
        s.compilation = true;
        assert_eq!(tag_value("albumartist", &s, false), VARIOUS_ARTISTS);
    }

    #[test]
    fn extension_comes_from_the_source_file() {
        assert_eq!(tag_value("extension", &song(), false), "flac");
    }

    #[test]
    fn values_are_cleaned() {
        let mut s = song();
        s.artist = Some(" AC/DC ".into());
        s.title = Some("Mr. Blue".into());
        assert_eq!(tag_value("artist", &s, false), "ACDC");
        assert_eq!(tag_value("title", &s, false), "Mr. Blue");
        assert_eq!(tag_value("title", &s, true), "Mr Blue");
        assert_eq!(tag_value("nosuchtag", &s, false), "");
    }
}
