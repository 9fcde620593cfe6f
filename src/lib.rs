//! Groundwork - Configuration & Logging Bootstrap
//!
//! Groundwork loads an environment-selected YAML settings file with
//! environment-variable substitution and initializes process-wide logging
//! from its `logging` section.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     let _logging = groundwork::setup_logger()?;
//!     let log = groundwork::get_logger("main");
//!     log.info("starting up");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod logging;

// Re-export commonly used types for convenience
pub use config::{current_env, load_settings, load_settings_from, SettingsError};
pub use logging::{
    get_logger, init_logging, setup_logger, LogConfig, Logger, LoggingHandle, RotateConfig,
};
