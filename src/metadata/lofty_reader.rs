use super::{leading_number, MetadataReader};
use crate::models::Song;
use anyhow::{Context, Result};
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::read_from_path;
use lofty::tag::{ItemKey, Tag};
use std::path::Path;
use tracing::debug;

/// Reads tags and audio properties with `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyReader;

impl LoftyReader {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataReader for LoftyReader {
    fn read(&self, path: &Path) -> Result<Song> {
        let tagged_file = read_from_path(path).with_context(|| format!("reading tags from {}", path.display()))?;

        let mut song = Song::new(path);

        let properties = tagged_file.properties();
        song.length_nanos = i64::try_from(properties.duration().as_nanos()).ok();
        song.bitrate = properties.audio_bitrate().and_then(|v| i32::try_from(v).ok());
        song.samplerate = properties.sample_rate().and_then(|v| i32::try_from(v).ok());
        song.bitdepth = properties.bit_depth().map(i32::from);

        // prefer the format's primary tag, fall back to whatever tag exists
        let tag: Option<&Tag> = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());
        match tag {
            Some(tag) => fill_from_tag(&mut song, tag),
            None => debug!("no tags in {}", path.display()),
        }

        Ok(song)
    }
}

fn fill_from_tag(song: &mut Song, tag: &Tag) {
    let text = |key: ItemKey| {
        tag.get_string(&key)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };
    let number = |key: ItemKey| tag.get_string(&key).and_then(leading_number);

    song.title = text(ItemKey::TrackTitle);
    song.album = text(ItemKey::AlbumTitle);
    song.artist = text(ItemKey::TrackArtist);
    song.album_artist = text(ItemKey::AlbumArtist);
    song.composer = text(ItemKey::Composer);
    song.performer = text(ItemKey::Performer);
    song.grouping = text(ItemKey::ContentGroup);
    song.lyrics = text(ItemKey::Lyrics);
    song.genre = text(ItemKey::Genre);
    song.comment = text(ItemKey::Comment);
    song.track = number(ItemKey::TrackNumber);
    song.disc = number(ItemKey::DiscNumber);
    song.year = number(ItemKey::Year).or_else(|| number(ItemKey::RecordingDate));
    song.original_year = number(ItemKey::OriginalReleaseDate);
    song.compilation = tag
        .get_string(&ItemKey::FlagCompilation)
        .map(|v| matches!(v.trim(), "1" | "true" | "True"))
        .unwrap_or(false);
}
