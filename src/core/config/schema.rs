//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```toml
//! [auth]
//! username = "deploy"
//! password = "s3cret"
//! private_key_file = "~/.ssh/id_ed25519"
//! insecure_ignore_host_key = false
//! insecure_skip_tls_verify = false
//!
//! [output]
//! format = "json"
//! ```
//!
//! # Validation
//!
//! Unknown keys are rejected at parse time. Value checks that need no I/O
//! run in [`FileConfig::validate`]; private key material is checked later by
//! the auth resolver, after CLI overrides are applied.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::auth::AuthConfig;

/// Top-level config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Credentials used when cloning remote URLs
    pub auth: AuthConfig,

    /// Report rendering defaults
    pub output: Option<OutputConfig>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.auth.private_key_file {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "auth.private_key_file cannot be empty".to_string(),
                ));
            }
        }

        if let Some(key) = &self.auth.private_key {
            if key.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "auth.private_key cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Default report format
    pub format: Option<OutputFormat>,
}

/// How a report is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON object
    #[default]
    Json,
    /// One `key=value` line per field
    Text,
}
