//! Settings management
//!
//! Environment-selected YAML settings:
//! - `config/<ENV>.yaml` file loading
//! - `${VAR}` environment-variable substitution
//! - One-time dotenv defaults

pub mod loader;

pub use loader::{current_env, load_settings, load_settings_from, SettingsError};
