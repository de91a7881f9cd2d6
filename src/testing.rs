//! In-memory stand-ins for the media store and the audio backend.

use std::collections::{BTreeMap, HashSet};

use crate::audio::{
    AcquireOptions, AudioBackend, ResourceId, ResourceStatus, StatusListener, StatusUpdate,
};
use crate::error::{BackendError, StoreError};
use crate::library::{
    MediaEntry, MediaPage, MediaStore, PageQuery, PermissionStatus, Snapshot, Track,
    TrackId,
};

pub fn entry(id: &str, filename: &str) -> MediaEntry {
    MediaEntry {
        id: id.to_string(),
        uri: format!("/music/{filename}"),
        filename: filename.to_string(),
    }
}

pub fn track(name: &str) -> Track {
    Track::new(TrackId::new(name), format!("/music/{name}"), name)
}

pub fn snapshot(names: &[&str]) -> Snapshot {
    Snapshot::new(1, names.iter().map(|n| track(n)).collect())
}

/// Split `entries` into pages of `size` with offset cursors.
pub fn paginate(entries: Vec<MediaEntry>, size: usize) -> Vec<MediaPage> {
    let chunks: Vec<Vec<MediaEntry>> = entries.chunks(size).map(|c| c.to_vec()).collect();
    let total = chunks.len();
    chunks
        .into_iter()
        .enumerate()
        .map(|(i, entries)| MediaPage {
            entries,
            has_next_page: i + 1 < total,
            end_cursor: Some(format!("page-{}", i + 1)),
        })
        .collect()
}

pub struct FakeStore {
    pub pages: Vec<MediaPage>,
    pub permission: PermissionStatus,
    pub grant_on_request: bool,
    pub fail_on_page: Option<usize>,
    pub queries: Vec<PageQuery>,
}

impl FakeStore {
    pub fn granted(pages: Vec<MediaPage>) -> Self {
        Self {
            pages,
            permission: PermissionStatus::Granted,
            grant_on_request: true,
            fail_on_page: None,
            queries: Vec::new(),
        }
    }

    pub fn undetermined(pages: Vec<MediaPage>, grant_on_request: bool) -> Self {
        Self {
            permission: PermissionStatus::NotDetermined,
            grant_on_request,
            ..Self::granted(pages)
        }
    }
}

impl MediaStore for FakeStore {
    fn permission(&self) -> PermissionStatus {
        self.permission
    }

    fn request_permission(&mut self) -> PermissionStatus {
        if self.permission == PermissionStatus::NotDetermined {
            self.permission = if self.grant_on_request {
                PermissionStatus::Granted
            } else {
                PermissionStatus::Denied
            };
        }
        self.permission
    }

    fn fetch_page(&mut self, query: &PageQuery) -> Result<MediaPage, StoreError> {
        self.queries.push(query.clone());
        let index = match &query.after {
            None => 0,
            Some(cursor) => cursor
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| StoreError::InvalidCursor(cursor.clone()))?,
        };
        if self.fail_on_page == Some(index) {
            return Err(StoreError::Io {
                path: "/music".into(),
                source: std::io::Error::other("disk went away"),
            });
        }
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }
}

pub struct FakeResource {
    pub uri: String,
    pub playing: bool,
    pub looping: bool,
    pub position_ms: u64,
    pub listener: Option<StatusListener>,
}

/// Records every call and keeps acquire/release counters.
#[derive(Default)]
pub struct FakeBackend {
    next_id: u64,
    pub live: BTreeMap<ResourceId, FakeResource>,
    pub acquired: usize,
    pub released: usize,
    pub fail_uris: HashSet<String>,
    pub fail_subscribe: bool,
    pub calls: Vec<String>,
}

impl FakeBackend {
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn set_position(&mut self, id: ResourceId, position_ms: u64) {
        if let Some(r) = self.live.get_mut(&id) {
            r.position_ms = position_ms;
        }
    }

    pub fn playing_uri(&self) -> Option<&str> {
        self.live
            .values()
            .find(|r| r.playing)
            .map(|r| r.uri.as_str())
    }

    /// Emit a natural-end notification from `id`, as the host would.
    pub fn finish(&self, id: ResourceId, looping: bool) {
        self.emit(
            id,
            ResourceStatus {
                is_loaded: true,
                is_playing: false,
                is_looping: looping,
                position_ms: 0,
            },
            true,
        );
    }

    pub fn emit(&self, id: ResourceId, status: ResourceStatus, did_just_finish: bool) {
        if let Some(listener) = self.live.get(&id).and_then(|r| r.listener.as_ref()) {
            let _ = listener.send(StatusUpdate {
                resource: id,
                status,
                did_just_finish,
            });
        }
    }

    fn resource_mut(&mut self, id: ResourceId) -> Result<&mut FakeResource, BackendError> {
        self.live
            .get_mut(&id)
            .ok_or(BackendError::UnknownResource(id))
    }
}

impl AudioBackend for FakeBackend {
    fn acquire(&mut self, uri: &str, options: AcquireOptions) -> Result<ResourceId, BackendError> {
        self.calls.push(format!("acquire {uri}"));
        if self.fail_uris.contains(uri) {
            return Err(BackendError::Decode {
                uri: uri.to_string(),
                reason: "unreadable".into(),
            });
        }
        self.next_id += 1;
        let id = ResourceId::new(self.next_id);
        self.acquired += 1;
        self.live.insert(
            id,
            FakeResource {
                uri: uri.to_string(),
                playing: options.autoplay,
                looping: options.looping,
                position_ms: 0,
                listener: None,
            },
        );
        Ok(id)
    }

    fn subscribe(&mut self, id: ResourceId, listener: StatusListener) -> Result<(), BackendError> {
        self.calls.push(format!("subscribe {id}"));
        if self.fail_subscribe {
            return Err(BackendError::Output("no watcher".into()));
        }
        self.resource_mut(id)?.listener = Some(listener);
        Ok(())
    }

    fn release(&mut self, id: ResourceId) -> Result<(), BackendError> {
        self.calls.push(format!("release {id}"));
        self.live
            .remove(&id)
            .ok_or(BackendError::UnknownResource(id))?;
        self.released += 1;
        Ok(())
    }

    fn play(&mut self, id: ResourceId) -> Result<(), BackendError> {
        self.calls.push(format!("play {id}"));
        self.resource_mut(id)?.playing = true;
        Ok(())
    }

    fn pause(&mut self, id: ResourceId) -> Result<(), BackendError> {
        self.calls.push(format!("pause {id}"));
        self.resource_mut(id)?.playing = false;
        Ok(())
    }

    fn stop(&mut self, id: ResourceId) -> Result<(), BackendError> {
        self.calls.push(format!("stop {id}"));
        let r = self.resource_mut(id)?;
        r.playing = false;
        r.position_ms = 0;
        Ok(())
    }

    fn seek(&mut self, id: ResourceId, offset_ms: u64) -> Result<(), BackendError> {
        self.calls.push(format!("seek {id} {offset_ms}"));
        self.resource_mut(id)?.position_ms = offset_ms;
        Ok(())
    }

    fn status(&self, id: ResourceId) -> Result<ResourceStatus, BackendError> {
        let r = self
            .live
            .get(&id)
            .ok_or(BackendError::UnknownResource(id))?;
        Ok(ResourceStatus {
            is_loaded: true,
            is_playing: r.playing,
            is_looping: r.looping,
            position_ms: r.position_ms,
        })
    }
}
