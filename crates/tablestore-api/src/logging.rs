//! Subscriber setup for applications embedding tablestore.
//!
//! The library crates only emit `tracing` events. [`LogConfig::init`]
//! installs a global subscriber that prints them to stdout, a daily rolling
//! file, or both.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

const DEFAULT_LOG_FILE: &str = "tablestore.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Where log lines go
#[derive(Debug, Clone)]
pub enum LogOutput {
    /// Stdout only
    Stdout,
    /// A daily-rotated file
    File(PathBuf),
    /// Stdout and a daily-rotated file
    Both(PathBuf),
}

/// Line format
#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    /// Multi-line, human oriented
    Pretty,
    /// One line per event
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive in `EnvFilter` syntax, e.g. `info` or `tablestore_storage=debug`
    pub level: String,
    /// Output destination
    pub output: LogOutput,
    /// Line format, applied to every output
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new("info")
    }
}

impl LogConfig {
    /// Compact stdout logging filtered by `level`.
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            output: LogOutput::Stdout,
            format: LogFormat::Compact,
        }
    }

    /// Log to a rolling file instead of stdout
    pub fn with_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::File(path.into());
        self
    }

    /// Log to stdout and a rolling file
    pub fn with_both<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::Both(path.into());
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    /// `RUST_LOG` wins over the configured level; an unparsable level
    /// falls back to `info`.
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }

    fn layers(&self) -> (Vec<BoxedLayer>, Option<WorkerGuard>) {
        let mut layers = Vec::new();
        let mut guard = None;

        if matches!(self.output, LogOutput::Stdout | LogOutput::Both(_)) {
            layers.push(format_layer(self.format, std::io::stdout, true));
        }
        if let LogOutput::File(path) | LogOutput::Both(path) = &self.output {
            let (writer, file_guard) = tracing_appender::non_blocking(rolling_appender(path));
            layers.push(format_layer(self.format, writer, false));
            guard = Some(file_guard);
        }

        (layers, guard)
    }

    /// Installs the global subscriber.
    ///
    /// Keep the returned guard alive while logging to a file; dropping it
    /// flushes and stops the background writer. If a subscriber is already
    /// installed it is left in place.
    ///
    /// ```rust,no_run
    /// use tablestore::logging::LogConfig;
    ///
    /// let _guard = LogConfig::new("debug").with_file("logs/tablestore.log").init();
    /// ```
    pub fn init(self) -> Option<WorkerGuard> {
        let (layers, guard) = self.layers();
        let installed = tracing_subscriber::registry()
            .with(layers)
            .with(self.env_filter())
            .try_init();

        if let Err(e) = installed {
            tracing::debug!(error = %e, "Keeping the existing global subscriber");
        }
        guard
    }
}

fn format_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer).with_ansi(ansi);
    match format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

fn rolling_appender(path: &Path) -> tracing_appender::rolling::RollingFileAppender {
    tracing_appender::rolling::daily(
        path.parent().unwrap_or_else(|| Path::new(".")),
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_LOG_FILE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert!(matches!(config.output, LogOutput::Stdout));
        assert!(matches!(config.format, LogFormat::Compact));
    }

    #[test]
    fn test_log_config_builders() {
        let config = LogConfig::new("debug")
            .with_file("/tmp/tablestore-test.log")
            .with_format(LogFormat::Pretty);
        assert_eq!(config.level, "debug");
        assert!(matches!(config.output, LogOutput::File(_)));
        assert!(matches!(config.format, LogFormat::Pretty));

        let config = LogConfig::new("warn").with_level("tablestore=trace").with_both("x.log");
        assert_eq!(config.level, "tablestore=trace");
        assert!(matches!(config.output, LogOutput::Both(_)));
    }

    #[test]
    fn test_layers_per_output() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("t.log");

        let (layers, guard) = LogConfig::default().layers();
        assert_eq!(layers.len(), 1);
        assert!(guard.is_none());

        let (layers, guard) = LogConfig::default().with_file(&log).layers();
        assert_eq!(layers.len(), 1);
        assert!(guard.is_some());

        let (layers, guard) = LogConfig::default().with_both(&log).layers();
        assert_eq!(layers.len(), 2);
        assert!(guard.is_some());
    }

    #[test]
    fn test_second_init_keeps_first_subscriber() {
        let _first = LogConfig::new("warn").init();
        let _second = LogConfig::new("debug").init();
    }

    #[test]
    fn test_invalid_level_does_not_panic() {
        let _filter = LogConfig::default().with_level("not a [valid filter").env_filter();
    }
}
