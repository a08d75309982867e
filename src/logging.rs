//! Tasktree Logging System
//!
//! Structured logging through `tracing`. Human-readable or JSON output,
//! to stdout or to a file.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Logging configuration options
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to output
    pub level: Level,
    /// Enable colored output
    pub color: bool,
    /// Show timestamps
    pub show_timestamps: bool,
    /// Show target/module name
    pub show_target: bool,
    /// Enable JSON format for machine parsing
    pub json_format: bool,
    /// Emit span close events
    pub enable_spans: bool,
    /// Output to file instead of stdout
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            color: true,
            show_timestamps: true,
            show_target: false,
            json_format: false,
            enable_spans: false,
            file_output: None,
        }
    }
}

impl LoggingConfig {
    /// Create config from CLI arguments. `-v` is DEBUG, `-vv` and above TRACE.
    pub fn from_args(quiet: bool, verbose: u8, json: bool) -> Self {
        let level = match verbose {
            0 if quiet => Level::ERROR,
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        };

        Self {
            level,
            color: !quiet && !json && io::stdout().is_terminal(),
            show_timestamps: true,
            show_target: verbose > 0,
            json_format: json,
            enable_spans: verbose > 1,
            file_output: None,
        }
    }

    pub fn with_file_output(mut self, path: Option<PathBuf>) -> Self {
        self.file_output = path;
        self
    }

    /// Default filter when `RUST_LOG` is not set.
    pub fn default_directive(&self) -> String {
        let level = self.level.to_string().to_lowercase();
        format!("tasktree={level},tower_http={level}")
    }
}

/// Initialize the logging system
pub fn init_logging(config: LoggingConfig) -> io::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let registry = Registry::default().with(env_filter);
    let span_events = if config.enable_spans {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    if let Some(log_file) = config.file_output {
        let directory = match log_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = log_file.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "Invalid log file name")
        })?;
        std::fs::create_dir_all(&directory)?;
        let file_appender = tracing_appender::rolling::never(directory, file_name);

        if config.json_format {
            let json_layer = fmt::layer()
                .json()
                .with_current_span(config.enable_spans)
                .with_span_events(span_events)
                .with_writer(file_appender);
            json_layer.with_subscriber(registry).init();
        } else {
            fmt::layer()
                .with_target(config.show_target)
                .with_level(true)
                .with_ansi(false)
                .with_span_events(span_events)
                .with_timer(fmt::time::ChronoUtc::rfc_3339())
                .with_writer(file_appender)
                .with_subscriber(registry)
                .init();
        }
    } else if config.json_format {
        let json_layer = fmt::layer()
            .json()
            .with_current_span(config.enable_spans)
            .with_span_events(span_events)
            .with_writer(io::stdout);
        json_layer.with_subscriber(registry).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_target(config.show_target)
            .with_level(true)
            .with_ansi(config.color)
            .with_span_events(span_events)
            .with_writer(io::stdout);

        if config.show_timestamps {
            fmt_layer
                .with_timer(fmt::time::ChronoUtc::rfc_3339())
                .with_subscriber(registry)
                .init();
        } else {
            fmt_layer.without_time().with_subscriber(registry).init();
        }
    }

    Ok(())
}
