//! Logging bootstrap
//!
//! One-shot process-wide logging using tracing and tracing-subscriber:
//! - Console output (stderr), always
//! - Optional plain or time-rotated file output
//! - Placeholder-based `%(...)s` line templates

pub mod config;
pub mod format;
pub mod logger;

pub use config::{LogConfig, RotateConfig};
pub use format::LineFormat;
pub use logger::{get_logger, init_logging, setup_logger, Logger, LoggingHandle};
