//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace, LevelFilter};

/// Initialize the logging system
///
/// Reads `RUST_LOG` first, then applies `level` on top. Calling this more
/// than once is harmless; later calls keep the first logger.
pub fn init(level: LevelFilter) {
    let result = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();

    if result.is_err() {
        log::trace!("Logger already initialized, keeping existing configuration");
    }
}

/// Parse a level name such as `"debug"` or `"warn"`
///
/// Unknown names fall back to [`LevelFilter::Info`].
pub fn parse_level(name: &str) -> LevelFilter {
    name.trim().parse().unwrap_or_else(|_| {
        log::warn!("Unknown log level '{}', using 'info'", name);
        LevelFilter::Info
    })
}
