//! Small types shared by the audio backends and the player.

use std::fmt;
use std::sync::mpsc::Sender;

/// Handle to one acquired playback resource.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u64);

impl ResourceId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AcquireOptions {
    /// Start playing as soon as the resource is loaded.
    pub autoplay: bool,
    /// Repeat the stream forever; a looping resource never finishes.
    pub looping: bool,
}

/// Point-in-time status of a resource.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceStatus {
    pub is_loaded: bool,
    pub is_playing: bool,
    pub is_looping: bool,
    pub position_ms: u64,
}

/// Notification sent to subscribers of a resource.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Resource that emitted the update.
    pub resource: ResourceId,
    pub status: ResourceStatus,
    /// Set once, when the stream reached its natural end.
    pub did_just_finish: bool,
}

pub type StatusListener = Sender<StatusUpdate>;
