//! Utilities for feeding `rodio` sinks from track locators.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{Decoder, Sink, Source};

use crate::error::BackendError;

use super::types::ResourceStatus;

/// Map a track locator to a filesystem path. Accepts plain paths and `file://` URIs.
pub(super) fn path_from_uri(uri: &str) -> PathBuf {
    PathBuf::from(uri.strip_prefix("file://").unwrap_or(uri))
}

/// Create a paused `Sink` on `mixer` loaded with `uri`.
pub(super) fn create_sink(mixer: &Mixer, uri: &str, looping: bool) -> Result<Sink, BackendError> {
    let sink = Sink::connect_new(mixer);
    sink.pause();
    append_source(&sink, uri, looping, Duration::ZERO)?;
    Ok(sink)
}

/// Decode `uri` and queue it on `sink`, starting `start_at` into the stream.
///
/// Used to load a fresh sink and to refill one that already drained, where
/// `Sink::try_seek` has nothing left to seek in.
pub(super) fn append_source(
    sink: &Sink,
    uri: &str,
    looping: bool,
    start_at: Duration,
) -> Result<(), BackendError> {
    let path = path_from_uri(uri);
    let file = File::open(&path).map_err(|source| BackendError::Open {
        uri: uri.to_string(),
        source,
    })?;

    let source = Decoder::new(BufReader::new(file)).map_err(|e| BackendError::Decode {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;

    if looping {
        sink.append(source.skip_duration(start_at).repeat_infinite());
    } else {
        sink.append(source.skip_duration(start_at));
    }
    Ok(())
}

pub(super) fn status_of(sink: &Sink, looping: bool) -> ResourceStatus {
    ResourceStatus {
        is_loaded: true,
        is_playing: !sink.is_paused() && !sink.empty(),
        is_looping: looping,
        position_ms: sink.get_pos().as_millis() as u64,
    }
}
