use std::fmt;
use std::path::{Path, PathBuf};

/// Artist label used for files picked from disk.
pub const LOCAL_ARTIST: &str = "Local file";

/// Where a track's audio can be loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MediaSource {
    /// Remote resource, fetched over HTTP(S).
    Url(String),
    /// File on the local filesystem.
    File(PathBuf),
}

impl MediaSource {
    /// URI form of the source, as reported to desktop integrations.
    pub fn uri(&self) -> String {
        match self {
            MediaSource::Url(u) => u.clone(),
            MediaSource::File(p) => format!("file://{}", p.display()),
        }
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSource::Url(u) => f.write_str(u),
            MediaSource::File(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Which catalog a track came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Origin {
    Itunes,
    Local,
}

impl Origin {
    pub fn label(self) -> &'static str {
        match self {
            Origin::Itunes => "itunes",
            Origin::Local => "local",
        }
    }
}

/// Normalized metadata for a playable item.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub src: MediaSource,
    pub title: String,
    pub artist: String,
    pub cover: Option<String>,
    pub origin: Origin,
}

impl Track {
    /// Build a track for a file picked from disk.
    ///
    /// The title is the file name with its last extension stripped.
    pub fn local(path: &Path) -> Self {
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            src: MediaSource::File(path.to_path_buf()),
            title,
            artist: LOCAL_ARTIST.to_string(),
            cover: None,
            origin: Origin::Local,
        }
    }
}
