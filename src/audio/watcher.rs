//! Per-resource watcher thread reporting natural end of playback.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use rodio::Sink;
use tracing::{debug, trace};

use crate::error::BackendError;

use super::sink::status_of;
use super::types::{ResourceId, StatusListener, StatusUpdate};

/// Owner side of a watcher thread. Dropping it silences the thread.
pub(super) struct Watcher {
    released: Arc<AtomicBool>,
}

impl Watcher {
    pub(super) fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.release();
    }
}

/// Poll `sink` every `poll` and send a `did_just_finish` update to `listener`
/// each time it drains. The thread exits once released or when nobody listens.
///
/// `armed` treats the sink as running from the start, so a source that drains
/// before the first poll is still reported.
pub(super) fn spawn_watcher(
    id: ResourceId,
    sink: Arc<Sink>,
    looping: bool,
    listener: StatusListener,
    poll: Duration,
    armed: bool,
) -> Result<Watcher, BackendError> {
    let released = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&released);

    thread::Builder::new()
        .name(format!("cadenza-watch-{}", id.raw()))
        .spawn(move || {
            let mut was_running = armed || !sink.empty();
            loop {
                thread::sleep(poll);
                // Check before touching the sink: release stops the sink, which
                // would otherwise look like a natural end.
                if flag.load(Ordering::SeqCst) {
                    trace!("watcher {id} released");
                    return;
                }

                let empty = sink.empty();
                if was_running && empty {
                    debug!("resource {id} finished");
                    let update = StatusUpdate {
                        resource: id,
                        status: status_of(&sink, looping),
                        did_just_finish: true,
                    };
                    if listener.send(update).is_err() {
                        return;
                    }
                }
                was_running = !empty;
            }
        })
        .map_err(|e| BackendError::Output(format!("cannot spawn watcher: {e}")))?;

    Ok(Watcher { released })
}
