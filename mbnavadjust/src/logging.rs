//! Diagnostic logging setup.
//!
//! Library code only emits `tracing` events. Binaries call [`init_logging`]
//! once at startup to send them to stderr and, optionally, to a file.
//! `RUST_LOG` takes precedence over the configured level.

use std::path::PathBuf;

use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Maps a count of `-v` flags to a level, starting from warnings.
    pub fn from_verbosity(count: u8) -> Self {
        match count {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(name)
    }
}

/// Where and how much to log.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Also write plain-text events to this file.
    pub file: Option<PathBuf>,
}

/// Installs the global subscriber.
///
/// Returns the guard of the file writer, which must be held until exit so
/// buffered events are flushed. A second call leaves the first subscriber
/// in place.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));
    let timer = LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(timer.clone())
        .with_target(false);

    let (file_layer, guard) = match config.file.as_ref().and_then(|path| {
        let name = path.file_name()?.to_owned();
        let dir = path.parent().map(PathBuf::from).unwrap_or_default();
        Some((dir, name))
    }) {
        Some((dir, name)) => {
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_timer(timer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_verbosity() {
        assert_eq!(LogLevel::from_verbosity(0), LogLevel::Warn);
        assert_eq!(LogLevel::from_verbosity(1), LogLevel::Info);
        assert_eq!(LogLevel::from_verbosity(2), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbosity(9), LogLevel::Trace);
    }

    #[test]
    fn test_level_display_is_filter_directive() {
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert!(EnvFilter::try_new(LogLevel::Trace.to_string()).is_ok());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = LoggingConfig {
            level: LogLevel::Info,
            file: Some(dir.path().join("run.log")),
        };
        let guard = init_logging(&config);
        assert!(guard.is_some());
        let _ = init_logging(&LoggingConfig::default());
    }
}
