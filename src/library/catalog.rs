use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::LibrarySettings;
use crate::error::CatalogError;

use super::model::{MediaEntry, Track, TrackId};
use super::store::{MediaStore, MediaType, PageQuery, PermissionStatus};

/// Ordered, immutable list of playable tracks.
#[derive(Debug, Default)]
pub struct Snapshot {
    generation: u64,
    tracks: Vec<Track>,
}

impl Snapshot {
    pub fn new(generation: u64, tracks: Vec<Track>) -> Self {
        Self { generation, tracks }
    }

    /// Incremented on every successful refresh; 0 before the first one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Linear lookup by identity.
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id() == id)
    }

    /// Index one step away from `from` in the given direction, wrapping at both ends.
    pub fn step(&self, from: usize, direction: Direction) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        let from = from.min(len - 1);
        Some(match direction {
            Direction::Next => (from + 1) % len,
            Direction::Previous if from == 0 => len - 1,
            Direction::Previous => from - 1,
        })
    }
}

/// Direction of a skip through the catalog.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Result of a refresh that did not fail.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed { tracks: usize, dropped: usize },
    /// Access was never granted; the snapshot was left untouched.
    PermissionMissing,
}

/// Holds the media store and the latest published snapshot.
pub struct Catalog<S: MediaStore> {
    store: S,
    snapshot: Arc<Snapshot>,
    extensions: Vec<String>,
    page_size: usize,
}

impl<S: MediaStore> Catalog<S> {
    pub fn new(store: S, settings: &LibrarySettings) -> Self {
        let extensions = settings
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .map(|e| format!(".{e}"))
            .collect();

        Self {
            store,
            snapshot: Arc::new(Snapshot::default()),
            extensions,
            page_size: settings.page_size.max(1),
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn permission(&self) -> PermissionStatus {
        self.store.permission()
    }

    pub fn request_permission(&mut self) -> PermissionStatus {
        let status = self.store.request_permission();
        info!("media permission: {status:?}");
        status
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Re-enumerate the store and publish a new snapshot.
    ///
    /// Nothing is published unless every page was fetched.
    pub fn refresh(&mut self) -> Result<RefreshOutcome, CatalogError> {
        if !self.store.permission().is_granted() {
            warn!("refresh skipped: media access not granted");
            return Ok(RefreshOutcome::PermissionMissing);
        }

        let entries = self.fetch_all()?;
        let fetched = entries.len();

        let mut seen: HashSet<String> = HashSet::with_capacity(fetched);
        let mut tracks: Vec<Track> = Vec::with_capacity(fetched);
        for entry in entries {
            if !self.is_supported(&entry) {
                continue;
            }
            if !seen.insert(entry.id.clone()) {
                warn!("duplicate media id {:?} ignored", entry.id);
                continue;
            }
            tracks.push(Track::from(entry));
        }

        // `sort_by` is stable, so equal keys keep enumeration order.
        tracks.sort_by(|a, b| {
            a.filename()
                .to_lowercase()
                .cmp(&b.filename().to_lowercase())
        });

        let count = tracks.len();
        let dropped = fetched - count;
        let generation = self.snapshot.generation() + 1;
        self.snapshot = Arc::new(Snapshot::new(generation, tracks));

        info!("catalog refreshed: {count} tracks ({dropped} entries dropped)");
        Ok(RefreshOutcome::Refreshed {
            tracks: count,
            dropped,
        })
    }

    fn fetch_all(&mut self) -> Result<Vec<MediaEntry>, CatalogError> {
        let mut entries = Vec::new();
        let mut after: Option<String> = None;
        let mut page = 0usize;

        loop {
            let query = PageQuery {
                media_type: MediaType::Audio,
                first: self.page_size,
                after: after.take(),
            };
            let result = self
                .store
                .fetch_page(&query)
                .map_err(|source| CatalogError::Fetch { page, source })?;
            debug!("page {page}: {} entries", result.entries.len());

            entries.extend(result.entries);
            if !result.has_next_page {
                break;
            }
            match result.end_cursor {
                Some(cursor) => after = Some(cursor),
                None => return Err(CatalogError::MissingCursor { page }),
            }
            page += 1;
        }

        Ok(entries)
    }

    fn is_supported(&self, entry: &MediaEntry) -> bool {
        self.extensions.iter().any(|ext| entry.uri.ends_with(ext.as_str()))
    }
}
