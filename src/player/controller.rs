use std::mem;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use tracing::{debug, error, info, warn};

use crate::audio::{AcquireOptions, AudioBackend, StatusUpdate};
use crate::config::PlaybackSettings;
use crate::error::PlayerError;
use crate::library::{Direction, Snapshot, Track};

use super::session::{PlaybackState, Session};

/// Drives one `AudioBackend` on behalf of the playback session.
pub struct Controller<B: AudioBackend> {
    backend: B,
    session: Session,
    status_tx: Sender<StatusUpdate>,
    status_rx: Receiver<StatusUpdate>,
    auto_advance: bool,
    looping: bool,
}

impl<B: AudioBackend> Controller<B> {
    pub fn new(backend: B, settings: &PlaybackSettings) -> Self {
        let (status_tx, status_rx) = mpsc::channel();
        Self {
            backend,
            session: Session::idle(),
            status_tx,
            status_rx,
            auto_advance: settings.auto_advance,
            looping: settings.looping,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Release whatever is playing and start `track` from the beginning.
    ///
    /// `track` must belong to `snapshot`; otherwise nothing is touched.
    /// The snapshot's own entry for the id is what gets played.
    pub fn select_and_play(&mut self, snapshot: &Snapshot, track: &Track) -> Result<(), PlayerError> {
        let Some(track) = snapshot
            .position_of(track.id())
            .and_then(|pos| snapshot.get(pos))
            .cloned()
        else {
            return Err(PlayerError::UnknownTrack(track.id().clone()));
        };

        self.release_current();

        let options = AcquireOptions {
            autoplay: true,
            looping: self.looping,
        };
        let id = self
            .backend
            .acquire(track.uri(), options)
            .map_err(|source| {
                error!("cannot load {}: {source}", track.uri());
                PlayerError::Acquire {
                    uri: track.uri().to_string(),
                    source,
                }
            })?;

        if let Err(err) = self.backend.subscribe(id, self.status_tx.clone()) {
            error!("cannot watch {id}: {err}");
            if let Err(err) = self.backend.release(id) {
                warn!("releasing {id} failed: {err}");
            }
            return Err(err.into());
        }

        info!("playing {}", track.filename());
        self.session = Session::playing(track, id);
        Ok(())
    }

    /// Pause at the current offset, or resume from the offset captured at pause time.
    pub fn toggle_play_pause(&mut self) -> Result<(), PlayerError> {
        let Some(id) = self.session.resource() else {
            return Ok(());
        };

        match self.session.state() {
            PlaybackState::Playing => {
                let position_ms = self.backend.status(id)?.position_ms;
                self.backend.pause(id)?;
                debug!("paused {id} at {position_ms}ms");
                self.session = self.session.paused_at(position_ms);
            }
            PlaybackState::Paused => {
                let position_ms = self.session.paused_position_ms();
                self.backend.seek(id, position_ms)?;
                self.backend.play(id)?;
                debug!("resumed {id} from {position_ms}ms");
                self.session = self.session.resumed();
            }
            PlaybackState::Idle => {}
        }
        Ok(())
    }

    /// Skip one track in `direction`, wrapping at both ends of `snapshot`.
    ///
    /// With nothing loaded, `Next` starts the first track and `Previous` the last.
    pub fn advance(&mut self, snapshot: &Snapshot, direction: Direction) -> Result<(), PlayerError> {
        if snapshot.is_empty() {
            debug!("advance ignored: catalog is empty");
            return Ok(());
        }

        let target = match self.session.active_track() {
            Some(active) => {
                let current = snapshot
                    .position_of(active.id())
                    .ok_or_else(|| PlayerError::ActiveTrackNotFound(active.id().clone()))?;
                snapshot.step(current, direction)
            }
            None => match direction {
                Direction::Next => Some(0),
                Direction::Previous => Some(snapshot.len() - 1),
            },
        };

        match target.and_then(|i| snapshot.get(i)) {
            Some(track) => {
                let track = track.clone();
                self.select_and_play(snapshot, &track)
            }
            None => Ok(()),
        }
    }

    /// Play the loaded track again from offset 0, whatever its state.
    pub fn restart(&mut self) -> Result<(), PlayerError> {
        let Some(id) = self.session.resource() else {
            return Ok(());
        };

        self.backend.stop(id)?;
        self.backend.seek(id, 0)?;
        self.backend.play(id)?;
        // A finish queued before the rewind belongs to the previous run.
        let dropped = self.discard_pending();
        debug!("restarted {id}, {dropped} pending updates dropped");
        self.session = self.session.restarted();
        Ok(())
    }

    /// Offset to show for the loaded track: live while playing, frozen while paused.
    pub fn position_ms(&self) -> Option<u64> {
        let id = self.session.resource()?;
        match self.session.state() {
            PlaybackState::Playing => self.backend.status(id).ok().map(|s| s.position_ms),
            PlaybackState::Paused => Some(self.session.paused_position_ms()),
            PlaybackState::Idle => None,
        }
    }

    /// Handle every pending status update. Returns how many were acted upon.
    pub fn pump(&mut self, snapshot: &Snapshot) -> Result<usize, PlayerError> {
        let mut handled = 0;
        loop {
            match self.status_rx.try_recv() {
                Ok(update) => {
                    if self.handle_status(snapshot, update)? {
                        handled += 1;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        Ok(handled)
    }

    /// React to one status update. Updates from anything but the held
    /// resource are ignored; returns whether the update was acted upon.
    pub fn handle_status(&mut self, snapshot: &Snapshot, update: StatusUpdate) -> Result<bool, PlayerError> {
        if self.session.resource() != Some(update.resource) {
            debug!("ignoring stale update from {}", update.resource);
            return Ok(false);
        }

        if !update.status.is_loaded {
            let track = self.session.active_track().map(|t| t.id().clone());
            error!("resource {} unloaded during playback", update.resource);
            self.release_current();
            return match track {
                Some(id) => Err(PlayerError::Unloaded(id)),
                None => Ok(true),
            };
        }

        if update.did_just_finish && !update.status.is_looping {
            if !self.auto_advance {
                self.session = self.session.paused_at(0);
                return Ok(true);
            }
            self.advance(snapshot, Direction::Next)?;
            return Ok(true);
        }

        Ok(false)
    }

    /// Release the held resource and go back to `Idle`.
    pub fn shutdown(&mut self) {
        self.release_current();
    }

    fn discard_pending(&mut self) -> usize {
        self.status_rx.try_iter().count()
    }

    fn release_current(&mut self) {
        let previous = mem::take(&mut self.session);
        if let Some(id) = previous.resource() {
            // Forget the resource even if the backend complains.
            if let Err(err) = self.backend.release(id) {
                warn!("releasing {id} failed: {err}");
            }
        }
    }
}

impl<B: AudioBackend> Drop for Controller<B> {
    fn drop(&mut self) {
        self.release_current();
    }
}
