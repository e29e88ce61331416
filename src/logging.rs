//! Logging setup.
//!
//! Library code only emits `tracing` events. Binaries and tests that want to
//! see them install a subscriber here. Targets used by the crates:
//! `bookpath::identity`, `bookpath::mirror`, `bookpath::remote`,
//! `bookpath::sync`.

use std::str::FromStr;

use bookpath_engine::BookPathConfig;
use tracing::Level;

/// Install a global fmt subscriber at `level` (error, warn, info, debug,
/// trace; case-insensitive). Unknown levels fall back to info.
///
/// Returns false if a global subscriber was already installed.
pub fn init_logging(level: &str) -> bool {
    let parsed = Level::from_str(level.trim()).ok();
    let installed = tracing_subscriber::fmt()
        .with_max_level(parsed.unwrap_or(Level::INFO))
        .with_target(true)
        .try_init()
        .is_ok();
    if parsed.is_none() {
        tracing::warn!(level, "Unknown log level, using info");
    }
    installed
}

/// Install the global subscriber at the configured `log_level`.
pub fn init_logging_from(config: &BookPathConfig) -> bool {
    init_logging(&config.log_level)
}
