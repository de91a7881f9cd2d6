//! Application module: the view model, user intents and the shell that
//! routes intents into the catalog and the playback controller.

mod intent;
mod model;
mod shell;

pub use intent::Intent;
pub use model::*;
pub use shell::Shell;
