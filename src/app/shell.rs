use tracing::{info, warn};

use crate::audio::AudioBackend;
use crate::library::{Catalog, MediaStore, PermissionStatus, RefreshOutcome};
use crate::player::Controller;

use super::intent::Intent;
use super::model::App;

/// Wires the catalog and the controller to the view model.
///
/// `dispatch` is the error boundary: failures end up as a diagnostic in
/// `App::message`, never as an early return.
pub struct Shell<S: MediaStore, B: AudioBackend> {
    pub catalog: Catalog<S>,
    pub controller: Controller<B>,
    pub app: App,
}

impl<S: MediaStore, B: AudioBackend> Shell<S, B> {
    pub fn new(catalog: Catalog<S>, controller: Controller<B>) -> Self {
        let app = App::new(catalog.snapshot());
        Self {
            catalog,
            controller,
            app,
        }
    }

    /// Ask for media access once and load the library if it was granted.
    pub fn start(&mut self) {
        self.app.permission = self.catalog.request_permission();
        match self.app.permission {
            PermissionStatus::Granted => self.refresh(),
            PermissionStatus::Denied => {
                self.app.report("media access denied; refresh disabled");
            }
            PermissionStatus::NotDetermined => {}
        }
    }

    /// Apply one intent. Returns `true` when the user asked to quit.
    pub fn dispatch(&mut self, intent: Intent) -> bool {
        let snapshot = self.catalog.snapshot();
        let result = match intent {
            Intent::Quit => {
                self.controller.shutdown();
                self.sync();
                return true;
            }
            Intent::Refresh => {
                self.refresh();
                return false;
            }
            Intent::Select(track) => self.controller.select_and_play(&snapshot, &track),
            Intent::TogglePlayPause => self.controller.toggle_play_pause(),
            Intent::Advance(direction) => self.controller.advance(&snapshot, direction),
            Intent::Restart => self.controller.restart(),
        };

        match result {
            Ok(()) => self.app.clear_message(),
            Err(err) => {
                warn!("{err}");
                self.app.report(err.to_string());
            }
        }
        self.sync();
        false
    }

    /// Process pending playback notifications (auto-advance) and refresh the view.
    pub fn tick(&mut self) {
        let snapshot = self.catalog.snapshot();
        if let Err(err) = self.controller.pump(&snapshot) {
            warn!("{err}");
            self.app.report(err.to_string());
        }
        self.sync();
    }

    fn refresh(&mut self) {
        match self.catalog.refresh() {
            Ok(RefreshOutcome::Refreshed { tracks, .. }) => {
                info!("library holds {tracks} tracks");
                self.app.set_snapshot(self.catalog.snapshot());
                self.app.report(format!("{tracks} tracks"));
            }
            Ok(RefreshOutcome::PermissionMissing) => {
                self.app.report("media access not granted");
            }
            Err(err) => {
                warn!("refresh failed: {err}");
                self.app.report(format!("refresh failed: {err}"));
            }
        }
        self.app.permission = self.catalog.permission();
    }

    fn sync(&mut self) {
        let position = self.controller.position_ms();
        self.app.sync_playback(self.controller.session(), position);
    }
}
