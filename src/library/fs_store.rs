use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::StoreError;

use super::model::MediaEntry;
use super::store::{MediaPage, MediaStore, MediaType, PageQuery, PermissionStatus};

/// A media store backed by a directory tree.
///
/// The first page of a query walks the tree; following pages are sliced out
/// of that listing so a cursor stays valid for the whole enumeration.
pub struct FsMediaStore {
    root: PathBuf,
    settings: LibrarySettings,
    permission: PermissionStatus,
    listing: Vec<MediaEntry>,
}

impl FsMediaStore {
    pub fn new(root: impl Into<PathBuf>, settings: LibrarySettings) -> Self {
        Self {
            root: root.into(),
            settings,
            permission: PermissionStatus::NotDetermined,
            listing: Vec::new(),
        }
    }

    fn walk(&self) -> Result<Vec<MediaEntry>, StoreError> {
        // Surface an unreadable root as an error; deeper failures only skip entries.
        fs::read_dir(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut walker = WalkDir::new(&self.root)
            .follow_links(self.settings.follow_links)
            .sort_by_file_name();

        // Non-recursive = only the root directory.
        let depth_cap = if self.settings.recursive {
            self.settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        let include_hidden = self.settings.include_hidden;
        let mut entries = Vec::new();
        for entry in walker
            .into_iter()
            .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("skipping unreadable library entry: {err}");
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() || !is_media_file(path, &self.settings.media_extensions) {
                continue;
            }
            if let Some(media) = self.entry_for(path) {
                entries.push(media);
            }
        }

        Ok(entries)
    }

    fn entry_for(&self, path: &Path) -> Option<MediaEntry> {
        let filename = path.file_name()?.to_str()?.to_string();
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let id = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

        Some(MediaEntry {
            id,
            uri: absolute.display().to_string(),
            filename,
        })
    }
}

impl MediaStore for FsMediaStore {
    fn permission(&self) -> PermissionStatus {
        self.permission
    }

    fn request_permission(&mut self) -> PermissionStatus {
        if self.permission == PermissionStatus::Denied {
            return self.permission;
        }

        self.permission = match fs::read_dir(&self.root) {
            Ok(_) => PermissionStatus::Granted,
            Err(err) => {
                info!("media access denied for {}: {err}", self.root.display());
                PermissionStatus::Denied
            }
        };
        self.permission
    }

    fn fetch_page(&mut self, query: &PageQuery) -> Result<MediaPage, StoreError> {
        if !self.permission.is_granted() {
            return Err(StoreError::PermissionDenied);
        }
        match query.media_type {
            MediaType::Audio => {}
        }

        let start = match &query.after {
            None => {
                self.listing = self.walk()?;
                debug!(
                    "walked {} ({} audio entries)",
                    self.root.display(),
                    self.listing.len()
                );
                0
            }
            Some(cursor) => cursor
                .parse::<usize>()
                .ok()
                .filter(|&offset| offset <= self.listing.len())
                .ok_or_else(|| StoreError::InvalidCursor(cursor.clone()))?,
        };

        let end = start.saturating_add(query.first.max(1)).min(self.listing.len());
        let has_next_page = end < self.listing.len();

        Ok(MediaPage {
            entries: self.listing[start..end].to_vec(),
            has_next_page,
            end_cursor: Some(end.to_string()),
        })
    }
}

fn is_media_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .any(|e| e.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
