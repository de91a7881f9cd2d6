use crate::error::BackendError;

use super::types::{AcquireOptions, ResourceId, ResourceStatus, StatusListener};

/// Host audio playback capability.
///
/// Every method addressing a released or unknown resource fails with
/// `BackendError::UnknownResource`.
pub trait AudioBackend {
    /// Open `uri` and prepare it for playback.
    fn acquire(&mut self, uri: &str, options: AcquireOptions) -> Result<ResourceId, BackendError>;

    /// Register `listener` for status updates of `id`, replacing any previous one.
    fn subscribe(&mut self, id: ResourceId, listener: StatusListener) -> Result<(), BackendError>;

    /// Stop and drop the resource. No update is delivered for it afterwards.
    fn release(&mut self, id: ResourceId) -> Result<(), BackendError>;

    fn play(&mut self, id: ResourceId) -> Result<(), BackendError>;

    fn pause(&mut self, id: ResourceId) -> Result<(), BackendError>;

    /// Halt output and rewind to the start, keeping the resource loaded.
    fn stop(&mut self, id: ResourceId) -> Result<(), BackendError>;

    fn seek(&mut self, id: ResourceId, offset_ms: u64) -> Result<(), BackendError>;

    fn status(&self, id: ResourceId) -> Result<ResourceStatus, BackendError>;
}
