use std::fmt;

/// Opaque identifier of a track, stable across refreshes of the same store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One playable file as published by the catalog.
///
/// Fields are read-only once built; the player only ever clones a track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    id: TrackId,
    uri: String,
    filename: String,
}

impl Track {
    pub fn new(id: TrackId, uri: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            id,
            uri: uri.into(),
            filename: filename.into(),
        }
    }

    pub fn id(&self) -> &TrackId {
        &self.id
    }

    /// Locator handed to the audio backend.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Display name, also the sort key.
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// Raw entry returned by a media store page, before filtering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaEntry {
    pub id: String,
    pub uri: String,
    pub filename: String,
}

impl From<MediaEntry> for Track {
    fn from(entry: MediaEntry) -> Self {
        Track::new(TrackId(entry.id), entry.uri, entry.filename)
    }
}
