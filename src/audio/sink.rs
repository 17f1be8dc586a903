//! Opening media sources and building `rodio` sinks from them.
//!
//! Remote sources are fetched once and kept in memory so the sink can be
//! rebuilt for seeks and restarts without another request.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use lofty::prelude::AudioFile;
use lofty::probe::Probe;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::library::MediaSource;

use super::types::MediaError;

pub(super) enum MediaData {
    File(PathBuf),
    Memory(Arc<[u8]>),
}

/// A source that has been fetched and checked to decode.
pub(super) struct LoadedMedia {
    pub data: MediaData,
    pub duration: Option<Duration>,
}

fn decode<R>(reader: R) -> Result<Decoder<R>, MediaError>
where
    R: Read + Seek + Send + Sync + 'static,
{
    Ok(Decoder::new(reader)?)
}

fn open_file(path: &Path) -> Result<BufReader<File>, MediaError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| MediaError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Resolve `src` into decodable data and work out its duration.
pub(super) fn open_media(
    src: &MediaSource,
    http: &reqwest::blocking::Client,
) -> Result<LoadedMedia, MediaError> {
    let data = match src {
        MediaSource::File(path) => MediaData::File(path.clone()),
        MediaSource::Url(url) => {
            let bytes = http
                .get(url)
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.bytes())
                .map_err(|source| MediaError::Fetch {
                    url: url.clone(),
                    source,
                })?;
            MediaData::Memory(Arc::from(&bytes[..]))
        }
    };

    let decoded_duration = match &data {
        MediaData::File(path) => decode(open_file(path)?)?.total_duration(),
        MediaData::Memory(bytes) => decode(Cursor::new(bytes.clone()))?.total_duration(),
    };
    let duration = decoded_duration
        .or_else(|| probe_duration(&data))
        .filter(|d| !d.is_zero());

    Ok(LoadedMedia { data, duration })
}

/// Read the duration from container metadata when the decoder can't tell.
pub(super) fn probe_duration(data: &MediaData) -> Option<Duration> {
    let tagged = match data {
        MediaData::File(path) => lofty::read_from_path(path).ok()?,
        MediaData::Memory(bytes) => Probe::new(Cursor::new(&bytes[..]))
            .guess_file_type()
            .ok()?
            .read()
            .ok()?,
    };
    Some(tagged.properties().duration())
}

/// Create a paused `Sink` for `media` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    media: &LoadedMedia,
    start_at: Duration,
    volume: f32,
) -> Result<Sink, MediaError> {
    let sink = Sink::connect_new(stream.mixer());
    sink.pause();
    sink.set_volume(volume);

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    match &media.data {
        MediaData::File(path) => sink.append(decode(open_file(path)?)?.skip_duration(start_at)),
        MediaData::Memory(bytes) => {
            sink.append(decode(Cursor::new(bytes.clone()))?.skip_duration(start_at))
        }
    }
    Ok(sink)
}
