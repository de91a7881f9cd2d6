//! Error types for the catalog, the playback backend and the controller.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::audio::ResourceId;
use crate::library::TrackId;

/// Failures reported by a `MediaStore` while enumerating entries.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("media access has not been granted")]
    PermissionDenied,
    #[error("cannot read media root {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid page cursor {0:?}")]
    InvalidCursor(String),
}

/// Failures of a catalog refresh. The previous snapshot is always kept.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("fetching page {page} failed: {source}")]
    Fetch {
        page: usize,
        #[source]
        source: StoreError,
    },
    #[error("page {page} reports more results but carries no cursor")]
    MissingCursor { page: usize },
}

/// Failures reported by an `AudioBackend`.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("cannot open {uri}: {source}")]
    Open {
        uri: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot decode {uri}: {reason}")]
    Decode { uri: String, reason: String },
    #[error("unknown resource {0}")]
    UnknownResource(ResourceId),
    #[error("seek failed on resource {id}: {reason}")]
    Seek { id: ResourceId, reason: String },
    #[error("audio output unavailable: {0}")]
    Output(String),
}

/// Failures of a transport operation on the playback session.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("unknown track {0}")]
    UnknownTrack(TrackId),
    #[error("active track {0} not found in the catalog")]
    ActiveTrackNotFound(TrackId),
    #[error("cannot load {uri}: {source}")]
    Acquire {
        uri: String,
        #[source]
        source: BackendError,
    },
    #[error("playback of {0} stopped unexpectedly")]
    Unloaded(TrackId),
    #[error(transparent)]
    Backend(#[from] BackendError),
}
