use crate::audio::ResourceId;
use crate::library::Track;

/// The playback state of the session.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Snapshot of the playback session.
///
/// Transitions build a new value instead of patching fields, so a session
/// is always one of: idle with nothing held, or a track with its resource.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    active: Option<Track>,
    state: PlaybackState,
    paused_position_ms: u64,
    resource: Option<ResourceId>,
}

impl Session {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn playing(track: Track, resource: ResourceId) -> Self {
        Self {
            active: Some(track),
            state: PlaybackState::Playing,
            paused_position_ms: 0,
            resource: Some(resource),
        }
    }

    /// Same track and resource, paused at `position_ms`.
    pub fn paused_at(&self, position_ms: u64) -> Self {
        Self {
            state: PlaybackState::Paused,
            paused_position_ms: position_ms,
            ..self.clone()
        }
    }

    /// Same track and resource, playing again.
    pub fn resumed(&self) -> Self {
        Self {
            state: PlaybackState::Playing,
            ..self.clone()
        }
    }

    /// Same track and resource, playing from the start.
    pub fn restarted(&self) -> Self {
        Self {
            state: PlaybackState::Playing,
            paused_position_ms: 0,
            ..self.clone()
        }
    }

    pub fn active_track(&self) -> Option<&Track> {
        self.active.as_ref()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Offset captured by the last pause; only meaningful while `Paused`.
    pub fn paused_position_ms(&self) -> u64 {
        self.paused_position_ms
    }

    pub fn resource(&self) -> Option<ResourceId> {
        self.resource
    }
}
