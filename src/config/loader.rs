use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;

use serde_yaml::Value;
use thiserror::Error;

/// Settings error types
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings file not found: {path}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read settings file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid YAML in settings file: {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

static DOTENV: Once = Once::new();

/// Load `.env` defaults into the process environment once.
///
/// Already-set variables are never overwritten; a missing `.env` file is
/// not an error.
fn init_dotenv() {
    DOTENV.call_once(|| {
        dotenvy::dotenv().ok();
    });
}

/// Name of the current environment, from `ENV` (default `dev`).
///
/// Selects both the settings file and the log file name. Read fresh on
/// every call.
pub fn current_env() -> String {
    env::var("ENV").unwrap_or_else(|_| "dev".to_string())
}

/// Path of the settings file for an environment name.
fn settings_path(env_name: &str) -> PathBuf {
    PathBuf::from("config").join(format!("{env_name}.yaml"))
}

/// Load the settings document for the current environment.
///
/// Reads `config/<ENV>.yaml`, substitutes `${VAR}` tokens for every set
/// environment variable, and parses the result as YAML. Every call repeats
/// the read, substitution, and parse; nothing is cached.
///
/// # Errors
/// Returns [`SettingsError::NotFound`] if the file is missing,
/// [`SettingsError::Io`] on any other read failure, and
/// [`SettingsError::Parse`] if the substituted text is not valid YAML.
pub fn load_settings() -> Result<Value, SettingsError> {
    init_dotenv();
    load_settings_from(settings_path(&current_env()))
}

/// Load a settings document from an explicit path.
///
/// Same contract as [`load_settings`], without the `ENV`-based path
/// resolution.
pub fn load_settings_from(path: impl AsRef<Path>) -> Result<Value, SettingsError> {
    let path = path.as_ref();

    let raw = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            SettingsError::NotFound {
                path: path.to_path_buf(),
                source,
            }
        } else {
            SettingsError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let substituted = substitute_env_vars(&raw, env::vars());

    serde_yaml::from_str(&substituted).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace `${K}` tokens with the value of each variable `K`.
///
/// Replacement is textual and case-sensitive, one variable at a time, in
/// iteration order. Tokens naming an unset variable are left verbatim.
/// Values are spliced in unescaped, so a value containing YAML-significant
/// characters changes the parse.
fn substitute_env_vars(text: &str, vars: impl Iterator<Item = (String, String)>) -> String {
    let mut out = text.to_string();

    for (key, value) in vars {
        let token = format!("${{{key}}}");
        if out.contains(&token) {
            out = out.replace(&token, &value);
        }
    }

    out
}
