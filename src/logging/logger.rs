use std::fs;
use std::io;

use anyhow::{Context, Result};
use tracing::{Dispatch, Level};
use tracing_appender::rolling::{self, RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use super::config::LogConfig;
use super::format::LineFormat;
use crate::config::{current_env, load_settings};

/// Logging context established by [`setup_logger`].
///
/// Owns the built dispatcher so callers can thread it explicitly (scoped
/// subscribers in tests, for example) instead of relying on the global
/// default. Dropping the handle does not tear logging down; the global
/// dispatcher lives until process exit.
#[derive(Debug, Clone)]
pub struct LoggingHandle {
    dispatch: Dispatch,
}

impl LoggingHandle {
    /// Dispatcher for scoped use via `tracing::subscriber::with_default`.
    pub fn dispatch(&self) -> Dispatch {
        self.dispatch.clone()
    }
}

/// Named logger handle.
///
/// Obtained from [`get_logger`]; valid before bootstrap (events then go to
/// the default, unconfigured dispatcher).
#[derive(Debug, Clone)]
pub struct Logger {
    name: String,
}

impl Logger {
    /// Name this logger was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Emit at TRACE severity.
    pub fn trace(&self, message: &str) {
        tracing::trace!(logger = self.name.as_str(), "{message}");
    }

    /// Emit at DEBUG severity.
    pub fn debug(&self, message: &str) {
        tracing::debug!(logger = self.name.as_str(), "{message}");
    }

    /// Emit at INFO severity.
    pub fn info(&self, message: &str) {
        tracing::info!(logger = self.name.as_str(), "{message}");
    }

    /// Emit at WARN severity.
    pub fn warn(&self, message: &str) {
        tracing::warn!(logger = self.name.as_str(), "{message}");
    }

    /// Emit at ERROR severity.
    pub fn error(&self, message: &str) {
        tracing::error!(logger = self.name.as_str(), "{message}");
    }
}

/// Get a named logger bound to the process-wide logging state.
///
/// Always succeeds; before [`setup_logger`] runs the handle emits through
/// the unconfigured default dispatcher.
pub fn get_logger(name: impl Into<String>) -> Logger {
    Logger { name: name.into() }
}

/// Initialize process-wide logging from the loaded settings.
///
/// Loads the settings document for the current environment, extracts the
/// `logging` section (defaults for anything absent), and installs a console
/// handler plus, when `to_file` is set, a plain or rotating file handler.
///
/// # Errors
/// A missing settings file or invalid YAML propagates out without any
/// handler being installed. Directory creation is idempotent; an existing
/// log directory is not an error.
pub fn setup_logger() -> Result<LoggingHandle> {
    let settings = load_settings().context("failed to load settings for logging bootstrap")?;
    let config = LogConfig::from_settings(&settings);
    init_logging(&config)
}

/// Initialize process-wide logging from an explicit configuration.
///
/// The global dispatcher is installed on the first call; later calls build
/// a fresh [`LoggingHandle`] but leave the installed dispatcher in place,
/// so handlers never accumulate across repeated bootstraps.
pub fn init_logging(config: &LogConfig) -> Result<LoggingHandle> {
    let level = resolve_level(&config.level);
    let format = LineFormat::parse(&config.format);

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(format.clone())
        .with_writer(io::stderr)
        .with_ansi(false);

    let file_layer = if config.to_file {
        fs::create_dir_all(&config.log_dir).with_context(|| {
            format!("failed to create log directory {}", config.log_dir.display())
        })?;

        let appender = build_file_appender(config, &current_env())?;

        Some(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(appender)
                .with_ansi(false),
        )
    } else {
        None
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer);

    let dispatch = Dispatch::new(subscriber);

    // First call wins; a repeated bootstrap keeps the installed dispatcher.
    let installed = tracing::dispatcher::set_global_default(dispatch.clone()).is_ok();

    if installed {
        tracing::info!(
            level = %level,
            file_output = config.to_file,
            "logging initialized"
        );

        if config.to_file && config.rotate.enabled {
            if config.rotate.interval != 1 {
                tracing::warn!(
                    interval = config.rotate.interval,
                    "rotation interval other than 1 is not supported, rolling every boundary"
                );
            }
            if config.rotate.suffix != "%Y%m%d" {
                tracing::warn!(
                    suffix = %config.rotate.suffix,
                    "custom rotation suffix is not supported, rotated files use ISO dates"
                );
            }
        }
    }

    Ok(LoggingHandle { dispatch })
}

/// Map a severity name to a level, case-insensitively.
///
/// Unknown names fall back to INFO rather than erroring.
fn resolve_level(name: &str) -> Level {
    match name.to_uppercase().as_str() {
        "TRACE" => Level::TRACE,
        "DEBUG" => Level::DEBUG,
        "WARN" | "WARNING" => Level::WARN,
        "ERROR" | "CRITICAL" | "FATAL" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Rollover boundary for a `when` spelling. Unknown spellings roll daily.
fn resolve_rotation(when: &str) -> Rotation {
    match when.to_lowercase().as_str() {
        "h" | "hour" | "hourly" => Rotation::HOURLY,
        "m" | "min" | "minute" | "minutely" => Rotation::MINUTELY,
        // "midnight", "d", "day", "daily", and anything unrecognized
        _ => Rotation::DAILY,
    }
}

/// Build the file appender for `<log_dir>/<env>.log`.
///
/// Rotation enabled: time-based rolling in local time, keeping at most
/// `backupCount` files. Rotation disabled: a single append-mode file.
fn build_file_appender(config: &LogConfig, env_name: &str) -> Result<RollingFileAppender> {
    let rotate = &config.rotate;

    if rotate.enabled {
        RollingFileAppender::builder()
            .rotation(resolve_rotation(&rotate.when))
            .filename_prefix(env_name)
            .filename_suffix("log")
            .max_log_files(rotate.backup_count)
            .build(&config.log_dir)
            .with_context(|| {
                format!(
                    "failed to create rotating log file in {}",
                    config.log_dir.display()
                )
            })
    } else {
        Ok(rolling::never(
            &config.log_dir,
            format!("{env_name}.log"),
        ))
    }
}
