use std::collections::HashMap;
use std::mem;
use std::sync::Arc;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info};

use crate::config::AudioSettings;
use crate::error::BackendError;

use super::backend::AudioBackend;
use super::sink::{append_source, create_sink, status_of};
use super::types::{AcquireOptions, ResourceId, ResourceStatus, StatusListener};
use super::watcher::{Watcher, spawn_watcher};

struct Resource {
    uri: String,
    looping: bool,
    /// Set until the first subscription: the source was started by `acquire`.
    autoplayed: bool,
    sink: Arc<Sink>,
    watcher: Option<Watcher>,
}

impl Resource {
    /// Stop output for good. The watcher is silenced first so the drained
    /// sink is not mistaken for a natural end.
    fn shutdown(self) {
        if let Some(w) = &self.watcher {
            w.release();
        }
        self.sink.stop();
    }

    /// Put the stream back at `offset`, reloading it if it already drained.
    fn seek_to(&self, id: ResourceId, offset: Duration) -> Result<(), BackendError> {
        if self.sink.empty() {
            return append_source(&self.sink, &self.uri, self.looping, offset);
        }
        self.sink.try_seek(offset).map_err(|e| BackendError::Seek {
            id,
            reason: e.to_string(),
        })
    }
}

/// Plays resources on the default output device.
pub struct RodioBackend {
    stream: OutputStream,
    resources: HashMap<ResourceId, Resource>,
    next_id: u64,
    poll_interval: Duration,
}

impl RodioBackend {
    pub fn open_default(settings: &AudioSettings) -> Result<Self, BackendError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| BackendError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would scribble
        // over the terminal UI.
        stream.log_on_drop(false);
        info!("audio output opened");

        Ok(Self {
            stream,
            resources: HashMap::new(),
            next_id: 1,
            poll_interval: Duration::from_millis(settings.status_poll_ms.max(1)),
        })
    }

    fn resource(&self, id: ResourceId) -> Result<&Resource, BackendError> {
        self.resources
            .get(&id)
            .ok_or(BackendError::UnknownResource(id))
    }
}

impl AudioBackend for RodioBackend {
    fn acquire(&mut self, uri: &str, options: AcquireOptions) -> Result<ResourceId, BackendError> {
        let sink = create_sink(self.stream.mixer(), uri, options.looping)?;
        if options.autoplay {
            sink.play();
        }

        let id = ResourceId::new(self.next_id);
        self.next_id += 1;
        debug!("acquired {id} for {uri}");

        self.resources.insert(
            id,
            Resource {
                uri: uri.to_string(),
                looping: options.looping,
                autoplayed: options.autoplay,
                sink: Arc::new(sink),
                watcher: None,
            },
        );
        Ok(id)
    }

    fn subscribe(&mut self, id: ResourceId, listener: StatusListener) -> Result<(), BackendError> {
        let poll = self.poll_interval;
        let resource = self
            .resources
            .get_mut(&id)
            .ok_or(BackendError::UnknownResource(id))?;

        let armed = mem::take(&mut resource.autoplayed);
        let watcher = spawn_watcher(
            id,
            Arc::clone(&resource.sink),
            resource.looping,
            listener,
            poll,
            armed,
        )?;
        // Replacing the watcher drops (and so silences) the previous one.
        resource.watcher = Some(watcher);
        Ok(())
    }

    fn release(&mut self, id: ResourceId) -> Result<(), BackendError> {
        let resource = self
            .resources
            .remove(&id)
            .ok_or(BackendError::UnknownResource(id))?;
        resource.shutdown();
        debug!("released {id}");
        Ok(())
    }

    fn play(&mut self, id: ResourceId) -> Result<(), BackendError> {
        self.resource(id)?.sink.play();
        Ok(())
    }

    fn pause(&mut self, id: ResourceId) -> Result<(), BackendError> {
        self.resource(id)?.sink.pause();
        Ok(())
    }

    fn stop(&mut self, id: ResourceId) -> Result<(), BackendError> {
        // `Sink::stop` empties the queue for good; pause and rewind instead.
        let resource = self.resource(id)?;
        resource.sink.pause();
        resource.seek_to(id, Duration::ZERO)
    }

    fn seek(&mut self, id: ResourceId, offset_ms: u64) -> Result<(), BackendError> {
        self.resource(id)?
            .seek_to(id, Duration::from_millis(offset_ms))
    }

    fn status(&self, id: ResourceId) -> Result<ResourceStatus, BackendError> {
        let resource = self.resource(id)?;
        Ok(status_of(&resource.sink, resource.looping))
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        for (_, resource) in self.resources.drain() {
            resource.shutdown();
        }
    }
}
