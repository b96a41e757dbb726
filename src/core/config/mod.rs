//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags and their environment variables (not handled here)
//!
//! # Config Locations
//!
//! The first existing file wins:
//! 1. `--config <file>` (must exist)
//! 2. `$REPOSTAMP_CONFIG` if set (warns when it points nowhere)
//! 3. `$XDG_CONFIG_HOME/repostamp/config.toml`
//! 4. `~/.repostamp/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use repostamp::core::config::Config;
//!
//! let result = Config::load(None).unwrap();
//! for warning in &result.warnings {
//!     eprintln!("warning: {}", warning.message);
//! }
//! println!("format: {:?}", result.config.output_format());
//! ```

pub mod schema;

pub use schema::{FileConfig, OutputConfig, OutputFormat};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::auth::AuthConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "REPOSTAMP_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file '{0}' does not exist")]
    Missing(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Loaded configuration plus where it came from.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents (defaults when no file was found)
    pub file: FileConfig,
    /// Path to the config file (if loaded)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `explicit`, or from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if `explicit` does not exist, or if a config file
    /// exists but cannot be read, parsed or validated. A missing file at a
    /// default location is not an error.
    pub fn load(explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        Self::load_with(explicit, |key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// [`Config::load`] with the environment and home directory supplied by
    /// the caller.
    pub fn load_with(
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::Missing(path.to_path_buf()));
            }
            let config = Self::read(path)?;
            return Ok(ConfigLoadResult { config, warnings });
        }

        if let Some(path) = env(CONFIG_ENV).filter(|p| !p.is_empty()) {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = Self::read(&path)?;
                return Ok(ConfigLoadResult { config, warnings });
            }
            warnings.push(ConfigWarning {
                message: format!("{} points to a missing file, ignoring it", CONFIG_ENV),
                path,
            });
        }

        if let Some(xdg_home) = env("XDG_CONFIG_HOME").filter(|p| !p.is_empty()) {
            let path = PathBuf::from(xdg_home).join("repostamp/config.toml");
            if path.exists() {
                let config = Self::read(&path)?;
                return Ok(ConfigLoadResult { config, warnings });
            }
        }

        if let Some(home) = home {
            let path = home.join(".repostamp/config.toml");
            if path.exists() {
                let config = Self::read(&path)?;
                return Ok(ConfigLoadResult { config, warnings });
            }
        }

        Ok(ConfigLoadResult {
            config: Config::default(),
            warnings,
        })
    }

    /// Read, parse and validate a config file.
    fn read(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        tracing::debug!(path = %path.display(), "loaded config file");

        Ok(Config {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Credential settings from the file.
    pub fn auth(&self) -> &AuthConfig {
        &self.file.auth
    }

    /// Report format.
    ///
    /// Defaults to JSON if not configured.
    pub fn output_format(&self) -> OutputFormat {
        self.file
            .output
            .as_ref()
            .and_then(|o| o.format)
            .unwrap_or_default()
    }

    /// Get the path to the loaded config file.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
