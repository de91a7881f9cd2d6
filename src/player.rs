//! Playback session controller.
//!
//! Owns the single live playback resource and sequences every transport
//! operation against it. `Controller` methods take `&mut self`, so callers
//! get one operation at a time by construction.

mod controller;
mod session;

pub use controller::*;
pub use session::*;
