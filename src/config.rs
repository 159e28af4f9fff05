//! Configuration loading and management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SMART_TODO_CONFIG";

/// Environment variable overriding the tasks file.
pub const TASKS_FILE_ENV: &str = "SMART_TODO_FILE";

/// Project-local config file name.
pub const PROJECT_CONFIG_FILE: &str = "smart-todo.yaml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Where tasks are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the CSV tasks file.
    #[serde(default = "default_tasks_file")]
    pub tasks_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            tasks_file: default_tasks_file(),
        }
    }
}

fn default_tasks_file() -> PathBuf {
    PathBuf::from("tasks.csv")
}

/// Summary report settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// File name used when none is given.
    #[serde(default = "default_export_file")]
    pub default_file: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_file: default_export_file(),
        }
    }
}

fn default_export_file() -> PathBuf {
    PathBuf::from("task_summary.txt")
}

/// Terminal output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Colorize terminal output.
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
        }
    }
}

fn default_color() -> bool {
    true
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Resolve configuration.
    ///
    /// An explicit path (argument, then `SMART_TODO_CONFIG`) must load.
    /// Otherwise `./smart-todo.yaml`, then `~/.smart-todo/config.yaml`, then
    /// defaults. `SMART_TODO_FILE` overrides the tasks file in every case.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => Self::discover(),
        };

        if let Some(tasks_file) = std::env::var_os(TASKS_FILE_ENV) {
            config.storage.tasks_file = PathBuf::from(tasks_file);
        }

        Ok(config)
    }

    fn discover() -> Self {
        let candidates = [Some(PathBuf::from(PROJECT_CONFIG_FILE)), user_config_path()];

        for path in candidates.into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            match Self::load(&path) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config");
                    return config;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %format!("{:#}", e), "Ignoring unreadable config");
                }
            }
        }

        Self::default()
    }
}

/// `~/.smart-todo/config.yaml`, if a home directory is known.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".smart-todo").join("config.yaml"))
}
