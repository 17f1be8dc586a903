use super::*;
use std::path::{Path, PathBuf};

#[test]
fn local_track_strips_last_extension_and_labels_artist() {
    let t = Track::local(Path::new("/music/Some Song.live.mp3"));
    assert_eq!(t.title, "Some Song.live");
    assert_eq!(t.artist, LOCAL_ARTIST);
    assert_eq!(t.cover, None);
    assert_eq!(t.origin, Origin::Local);
    assert_eq!(
        t.src,
        MediaSource::File(PathBuf::from("/music/Some Song.live.mp3"))
    );
}

#[test]
fn local_track_without_extension_keeps_full_name() {
    let t = Track::local(Path::new("/music/demo"));
    assert_eq!(t.title, "demo");
}

#[test]
fn media_source_uri_prefixes_files() {
    let f = MediaSource::File(PathBuf::from("/tmp/a.mp3"));
    assert_eq!(f.uri(), "file:///tmp/a.mp3");
    let u = MediaSource::Url("https://example.com/a.m4a".into());
    assert_eq!(u.uri(), "https://example.com/a.m4a");
    assert_eq!(u.to_string(), "https://example.com/a.m4a");
}

#[cfg(unix)]
#[test]
fn local_track_keeps_non_utf8_names_readable() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let path = Path::new(OsStr::from_bytes(b"/music/caf\xe9 del mar.mp3"));
    let t = Track::local(path);
    assert_eq!(t.title, "caf\u{FFFD} del mar");
}
