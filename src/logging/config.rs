use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::PathBuf;

/// Logging configuration, read from the `logging` section of the settings
/// document. Every field has a default, so an absent or partial section is
/// fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Severity name (case-insensitive; unknown names fall back to INFO)
    #[serde(default = "default_level")]
    pub level: String,

    /// Log line template with `%(asctime)s`, `%(levelname)s`, `%(name)s`,
    /// `%(message)s` placeholders
    #[serde(default = "default_format")]
    pub format: String,

    /// Write log lines to a file in addition to the console
    #[serde(default)]
    pub to_file: bool,

    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// File rotation policy
    #[serde(default)]
    pub rotate: RotateConfig,
}

/// Time-based rotation policy for the file output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotateConfig {
    /// Rotate at time boundaries instead of appending to a single file
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Rollover boundary (`midnight`, `h`, `m`, ...)
    #[serde(default = "default_when")]
    pub when: String,

    /// Number of boundaries between rollovers
    #[serde(default = "default_interval")]
    pub interval: u32,

    /// Maximum number of historical files to retain
    #[serde(default = "default_backup_count", rename = "backupCount")]
    pub backup_count: usize,

    /// Date pattern appended to rotated file names
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl LogConfig {
    /// Extract the `logging` sub-mapping from a settings document.
    ///
    /// An absent or undecodable section yields the full defaults; presence
    /// is the only check performed. A section that is present but fails to
    /// decode is reported before falling back, so a malformed config does
    /// not go dark silently.
    pub fn from_settings(settings: &Value) -> Self {
        let Some(section) = settings.get("logging") else {
            return Self::default();
        };

        serde_yaml::from_value(section.clone()).unwrap_or_else(|error| {
            tracing::warn!(%error, "logging section could not be decoded, using defaults");
            Self::default()
        })
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            to_file: false,
            log_dir: default_log_dir(),
            rotate: RotateConfig::default(),
        }
    }
}

impl Default for RotateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            when: default_when(),
            interval: default_interval(),
            backup_count: default_backup_count(),
            suffix: default_suffix(),
        }
    }
}

fn default_level() -> String {
    "INFO".to_string()
}

fn default_format() -> String {
    "[%(asctime)s] %(levelname)s %(name)s : %(message)s".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_true() -> bool {
    true
}

fn default_when() -> String {
    "midnight".to_string()
}

fn default_interval() -> u32 {
    1
}

fn default_backup_count() -> usize {
    7
}

fn default_suffix() -> String {
    "%Y%m%d".to_string()
}
