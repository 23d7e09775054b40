//! Diagnostic logging on stderr.
//!
//! Compact `LEVEL message` lines, no timestamps and no module paths. User
//! facing output (issue reports, summaries) goes to stdout separately.

use tracing_subscriber::{
    Layer, Registry, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Warn,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Warn => tracing::Level::WARN,
        }
    }
}

impl LogLevel {
    /// WARN by default, DEBUG with `-v`.
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose { LogLevel::Debug } else { LogLevel::Warn }
    }
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init_with_level(level: LogLevel) {
    let filter = LevelFilter::from_level(level.into());

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_level(true)
        .with_ansi(false)
        .compact()
        .with_filter(filter);

    let _ = Registry::default().with(layer).try_init();
}
