use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{self, LoggingSettings};

/// Send `tracing` output to the configured log file.
///
/// The terminal belongs to the UI, so nothing is ever written to stdout or
/// stderr once this is installed. `CADENZA_LOG` overrides `logging.level`.
pub fn init_logging(settings: &LoggingSettings) {
    let Some(path) = settings.file.clone().or_else(config::default_log_path) else {
        eprintln!("cadenza: no log location available, logging disabled");
        return;
    };

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("cadenza: cannot create {}: {e}; logging disabled", parent.display());
            return;
        }
    }

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("cadenza: cannot open {}: {e}; logging disabled", path.display());
            return;
        }
    };

    let filter = EnvFilter::try_from_env("CADENZA_LOG")
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();
    if let Err(e) = result {
        eprintln!("cadenza: logging already initialised: {e}");
    }
}
