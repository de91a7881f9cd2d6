//! The media store seam: permission gate and paginated enumeration.

use crate::error::StoreError;

use super::model::MediaEntry;

/// Access state of the media store.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PermissionStatus {
    #[default]
    NotDetermined,
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MediaType {
    Audio,
}

/// Request for one page of entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageQuery {
    pub media_type: MediaType,
    /// Maximum number of entries in the page.
    pub first: usize,
    /// Cursor returned as `end_cursor` by the previous page, `None` for the first.
    pub after: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaPage {
    pub entries: Vec<MediaEntry>,
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

pub trait MediaStore {
    /// Current permission state, without prompting.
    fn permission(&self) -> PermissionStatus;

    /// Ask for access. `Denied` is final for the lifetime of the store.
    fn request_permission(&mut self) -> PermissionStatus;

    fn fetch_page(&mut self, query: &PageQuery) -> Result<MediaPage, StoreError>;
}
