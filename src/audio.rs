//! Audio playback seam and its `rodio` implementation.
//!
//! The player talks to an [`AudioBackend`]; the production backend keeps
//! one `rodio::Sink` per acquired resource and reports natural completion
//! through a watcher thread per resource.

mod backend;
mod output;
mod sink;
mod types;
mod watcher;

pub use backend::AudioBackend;
pub use output::RodioBackend;
pub use types::*;

#[cfg(test)]
mod tests;
