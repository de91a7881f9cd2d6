//! Application model: what the terminal UI renders.
//!
//! The `App` struct holds the published catalog snapshot, the list cursor
//! and a copy of the playback session taken after every operation.

use std::sync::Arc;

use crate::library::{PermissionStatus, Snapshot, Track};
use crate::player::{PlaybackState, Session};

/// The main application model.
pub struct App {
    pub snapshot: Arc<Snapshot>,
    pub selected: usize,
    pub follow_playback: bool,

    pub session: Session,
    pub position_ms: Option<u64>,

    pub permission: PermissionStatus,
    /// Last diagnostic shown in the status box.
    pub message: Option<String>,
    pub current_dir: Option<String>,
}

impl App {
    /// Create a new `App` showing `snapshot`.
    pub fn new(snapshot: Arc<Snapshot>) -> Self {
        Self {
            snapshot,
            selected: 0,
            follow_playback: true,
            session: Session::idle(),
            position_ms: None,
            permission: PermissionStatus::NotDetermined,
            message: None,
            current_dir: None,
        }
    }

    /// Record the current directory in the app state.
    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    /// Swap in a new snapshot, keeping the cursor on the same track when it survived.
    pub fn set_snapshot(&mut self, snapshot: Arc<Snapshot>) {
        let keep = self.selected_track().map(|t| t.id().clone());
        self.snapshot = snapshot;
        self.selected = keep
            .and_then(|id| self.snapshot.position_of(&id))
            .unwrap_or(0);
    }

    /// Copy the session for rendering and, when following, move the cursor to it.
    pub fn sync_playback(&mut self, session: &Session, position_ms: Option<u64>) {
        self.session = session.clone();
        self.position_ms = position_ms;
        if self.follow_playback {
            if let Some(idx) = self.now_playing_index() {
                self.selected = idx;
            }
        }
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.snapshot.get(self.selected)
    }

    /// Index of the active track in the displayed snapshot, if it is listed there.
    pub fn now_playing_index(&self) -> Option<usize> {
        let active = self.session.active_track()?;
        self.snapshot.position_of(active.id())
    }

    pub fn is_playing(&self) -> bool {
        self.session.state() == PlaybackState::Playing
    }

    pub fn has_tracks(&self) -> bool {
        !self.snapshot.is_empty()
    }

    pub fn report(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Enable following playback (cursor follows currently playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    /// Disable follow-playback so the cursor can roam.
    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Move selection to the next track, wrapping to the first.
    pub fn next(&mut self) {
        if self.has_tracks() {
            self.selected = (self.selected + 1) % self.snapshot.len();
        }
    }

    /// Move selection to the previous track, wrapping to the last.
    pub fn prev(&mut self) {
        if self.has_tracks() {
            self.selected = match self.selected {
                0 => self.snapshot.len() - 1,
                i => i - 1,
            };
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.snapshot.len().saturating_sub(1);
    }
}
