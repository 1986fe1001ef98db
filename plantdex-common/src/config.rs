//! Bootstrap configuration loading and root folder resolution
//!
//! The TOML file is optional. A missing file is not an error: defaults are
//! used and a warning is logged. A file that exists but cannot be parsed is
//! a configuration error, since silently ignoring it would hide typos.
//!
//! Root folder resolution order:
//! 1. Explicit argument (highest priority)
//! 2. `PLANTDEX_ROOT_FOLDER` environment variable
//! 3. `root_folder` key of the TOML config
//! 4. OS-dependent compiled default

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "PLANTDEX_ROOT_FOLDER";

/// File name of the SQLite database inside the root folder
pub const DATABASE_FILE_NAME: &str = "plantdex.db";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit ANSI colours (disable when logging to a file or CI)
    #[serde(default = "default_ansi")]
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            ansi: default_ansi(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ansi() -> bool {
    true
}

/// Load any deserializable config struct from a TOML file
///
/// Missing file → `T::default()` with a warning.
pub fn load_toml_file<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        warn!(
            "Config file not found at {}, using built-in defaults",
            path.display()
        );
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)?;
    let parsed = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    debug!("Loaded config file {}", path.display());
    Ok(parsed)
}

/// Load the bootstrap configuration
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    load_toml_file(path)
}

/// Default location of the config file (`<config_dir>/plantdex/config.toml`)
pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("plantdex").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Resolve the root folder following the documented priority order
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("plantdex"))
        .unwrap_or_else(|| PathBuf::from("./plantdex_data"))
}

/// Path of the SQLite database for a given root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_defaults() {
        let logging = LoggingConfig::default();
        assert_eq!(logging.level, "info");
        assert!(logging.ansi);
    }

    #[test]
    fn test_cli_arg_wins() {
        let toml_config = TomlConfig {
            root_folder: Some(PathBuf::from("/from/toml")),
            logging: LoggingConfig::default(),
        };

        let resolved = resolve_root_folder(Some(Path::new("/from/cli")), &toml_config);
        assert_eq!(resolved, PathBuf::from("/from/cli"));
    }

    #[test]
    fn test_database_path_joins_file_name() {
        let path = database_path(Path::new("/data"));
        assert_eq!(path, PathBuf::from("/data/plantdex.db"));
    }

    #[test]
    fn test_default_config_path_under_config_dir() {
        // Headless environments may have no config dir at all
        if let Some(config_dir) = dirs::config_dir() {
            let path = default_config_path().unwrap();
            assert_eq!(path, config_dir.join("plantdex").join("config.toml"));
        } else {
            assert!(matches!(default_config_path(), Err(Error::Config(_))));
        }
    }
}
