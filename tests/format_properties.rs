use music_file_organizer::format::OrganizeFormat;
use music_file_organizer::sanitize::{self, OrganizeOptions};
use music_file_organizer::{FormatError, Song};

fn keep_spaces() -> OrganizeOptions {
    OrganizeOptions { replace_spaces: false, ..Default::default() }
}

fn the_wall() -> Song {
    let mut s = Song::new("/music/incoming/track03.mp3");
    s.album_artist = Some("Pink Floyd".into());
    s.album = Some("The Wall".into());
    s.track = Some(3);
    s.title = Some("Comfortably Numb".into());
    s
}

#[test]
fn end_to_end_example() {
    let f = OrganizeFormat::new("%albumartist/%album/{%track }%title").with_options(keep_spaces());
    let result = f.compute_path(&the_wall(), Some("flac")).unwrap();
    assert_eq!(result.path, "Pink Floyd/The Wall/03 Comfortably Numb.flac");
    assert!(result.unique);
}

#[test]
fn end_to_end_without_track_drops_the_block() {
    let mut s = the_wall();
    s.track = None;
    let f = OrganizeFormat::new("%albumartist/%album/{%track }%title").with_options(keep_spaces());
    assert_eq!(f.compute_path(&s, None).unwrap().path, "Pink Floyd/The Wall/Comfortably Numb.mp3");
}

#[test]
fn empty_block_collapses_but_bare_tag_does_not() {
    let mut s = the_wall();
    s.disc = Some(0);
    assert_eq!(OrganizeFormat::new("{Disc %disc}").substitute(&s).text, "");
    assert_eq!(OrganizeFormat::new("Disc %disc").substitute(&s).text, "Disc ");
}

#[test]
fn track_zero_padding() {
    let mut s = the_wall();
    s.track = Some(7);
    assert_eq!(OrganizeFormat::new("%track").substitute(&s).text, "07");
    s.track = Some(12);
    assert_eq!(OrganizeFormat::new("%track").substitute(&s).text, "12");
}

#[test]
fn unique_flag_follows_title_and_track() {
    let mut s = Song::new("/in/x.mp3");
    s.artist = Some("Artist".into());
    s.title = Some("Song".into());
    let f = OrganizeFormat::new("%artist - %title");
    assert!(f.compute_path(&s, None).unwrap().unique);

    s.title = None;
    let f = OrganizeFormat::new("%artist");
    let result = f.compute_path(&s, None).unwrap();
    assert!(!result.unique);
    assert_eq!(result.path, "Artist.mp3");
}

#[test]
fn fat_sanitization_folds_and_strips() {
    let mut s = Song::new("/in/x.flac");
    s.title = Some("Café: Best*".into());
    let f = OrganizeFormat::new("%title")
        .with_options(OrganizeOptions { remove_non_fat: true, replace_spaces: false, ..Default::default() });
    assert_eq!(f.compute_path(&s, None).unwrap().path, "Cafe Best.flac");
}

#[test]
fn spaces_are_replaced() {
    let mut s = Song::new("/in/x.mp3");
    s.title = Some("My Song".into());
    let f = OrganizeFormat::new("%title")
        .with_options(OrganizeOptions { replace_spaces: true, ..Default::default() });
    assert_eq!(f.compute_path(&s, None).unwrap().path, "My_Song.mp3");
}

#[test]
fn empty_format_falls_back_to_source_name() {
    let s = Song::new("/music/incoming/Some File.mp3");
    let f = OrganizeFormat::new("").with_options(keep_spaces());
    assert_eq!(f.compute_path(&s, None).unwrap().path, "Some File.mp3");
    assert_eq!(f.compute_path(&s, Some("flac")).unwrap().path, "Some File.flac");
    assert!(!f.compute_path(&s, None).unwrap().unique);

    let f = OrganizeFormat::new("");
    assert_eq!(f.compute_path(&s, None).unwrap().path, "Some_File.mp3");
}

#[test]
fn problematic_option_strips_dots_from_values_only() {
    let mut s = the_wall();
    s.title = Some("Mr. Blue Sky?".into());
    let f = OrganizeFormat::new("%title.v2")
        .with_options(OrganizeOptions { remove_problematic: true, replace_spaces: false, ..Default::default() });
    // the literal ".v2" survives and becomes the extension
    assert_eq!(f.compute_path(&s, None).unwrap().path, "Mr Blue Sky.v2");
}

#[test]
fn sanitization_is_a_fixed_point() {
    let opts = OrganizeOptions {
        remove_problematic: true,
        remove_non_fat: true,
        remove_non_ascii: true,
        allow_extended_ascii: true,
        replace_spaces: false,
    };
    for input in ["Björk/Homogenic/01 Hunter", "  Ünïcødé  <mess>|  ", "Ça va? / Très bien"] {
        let once = sanitize::apply_pipeline(input, &opts);
        assert_eq!(sanitize::apply_pipeline(&once, &opts), once, "input {input:?}");
    }
}

#[test]
fn compute_path_is_deterministic() {
    let f = OrganizeFormat::new("%albumartist/{%year - }%album/%track %title");
    let s = the_wall();
    assert_eq!(f.compute_path(&s, None), f.compute_path(&s, None));
}

#[test]
fn invalid_results_are_reported() {
    let f = OrganizeFormat::new("/%title");
    assert!(matches!(f.compute_path(&the_wall(), None), Err(FormatError::MalformedPath(_))));
    let f = OrganizeFormat::new("%title");
    assert_eq!(f.compute_path(&Song::default(), None), Err(FormatError::EmptyResult));
}

#[test]
fn zero_and_minus_one_text_values_count_as_unset() {
    let mut s = Song::new("/in/x.mp3");
    s.artist = Some("Band".into());
    s.title = Some("0".into());
    s.album = Some("-1".into());
    let f = OrganizeFormat::new("%artist{ - %title}{ [%album]}");
    let resolved = f.substitute(&s);
    assert_eq!(resolved.text, "Band");
    assert!(!resolved.unique);

    let result = f.compute_path(&s, None).unwrap();
    assert_eq!(result.path, "Band.mp3");
    assert!(!result.unique);
}

#[test]
fn extended_ascii_keeps_latin1_letters_of_stacked_accents() {
    let mut s = Song::new("/in/x.mp3");
    s.title = Some("\u{1E09}a \u{01D6}ber".into());
    let f = OrganizeFormat::new("%title").with_options(OrganizeOptions {
        remove_non_ascii: true,
        allow_extended_ascii: true,
        replace_spaces: false,
        ..Default::default()
    });
    assert_eq!(f.compute_path(&s, None).unwrap().path, "ça über.mp3");
}

#[test]
fn extension_tag_reads_dotfile_sources() {
    let s = Song::new("/in/.flac");
    assert_eq!(OrganizeFormat::new("x{.%extension}").substitute(&s).text, "x.flac");
}
