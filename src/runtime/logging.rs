use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, default_log_path};

/// Pick the filter directives: a non-blank `RUST_LOG` wins over the
/// configured filter.
pub fn filter_directives(rust_log: Option<String>, settings: &LoggingSettings) -> String {
    rust_log
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| settings.filter.clone())
}

/// Install the file logger. The terminal belongs to the UI, so nothing is
/// written to stdout or stderr once this returns.
///
/// Returns the log file path, or `None` if logging could not be set up.
pub fn init(settings: &LoggingSettings) -> Option<PathBuf> {
    let path = settings.file.clone().or_else(default_log_path)?;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("encore: cannot create log directory {}: {e}", parent.display());
            return None;
        }
    }

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("encore: cannot open log file {}: {e}", path.display());
            return None;
        }
    };

    let directives = filter_directives(std::env::var("RUST_LOG").ok(), settings);
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("encore: invalid log filter {directives:?} ({e}), using \"info\"");
        EnvFilter::new("info")
    });

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_env_filter(filter)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(path)
}
