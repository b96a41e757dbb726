//! auth - credential resolution for remote clones
//!
//! Turns raw credential inputs ([`AuthConfig`], from the config file and CLI
//! flags) into one opaque [`Auth`] value. The [`crate::git`] module turns that
//! value into libgit2 callbacks; nothing else looks inside it.
//!
//! # Precedence
//!
//! Later sources win when several are supplied:
//! 1. Inline private key text
//! 2. Private key file
//! 3. Username and password (only when both are non-empty)
//!
//! With none of them, [`Credential::None`] lets libgit2 use its defaults
//! (the SSH agent for SSH remotes).
//!
//! Every supplied key is validated, including one that a later source
//! overrides, so a bad key never goes unnoticed.
//!
//! The TLS and host-key bypass toggles are independent of the credential.
//!
//! # Security
//!
//! Key text and passwords never appear in logs, errors, or debug output.
//! [`AuthConfig`], [`KeySource`] and [`Credential`] implement a redacting
//! `Debug`.
//!
//! # Example
//!
//! ```
//! use repostamp::auth::{Auth, AuthConfig, Credential};
//!
//! let config = AuthConfig {
//!     username: Some("deploy".into()),
//!     password: Some("hunter2".into()),
//!     ..Default::default()
//! };
//! let auth = Auth::resolve(&config).unwrap();
//! assert!(matches!(auth.credential, Credential::BasicAuth { .. }));
//! assert!(!format!("{:?}", auth).contains("hunter2"));
//! ```

mod errors;
mod key;

pub use errors::AuthError;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const REDACTED: &str = "[REDACTED]";

/// Raw credential inputs.
///
/// This is the `[auth]` section of the config file; CLI flags produce a
/// second instance that is layered on top with [`AuthConfig::overridden_by`].
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Username for HTTP basic auth
    pub username: Option<String>,
    /// Password for HTTP basic auth
    pub password: Option<String>,
    /// Inline SSH private key text
    pub private_key: Option<String>,
    /// Path to an SSH private key file (`~/` is expanded)
    pub private_key_file: Option<PathBuf>,
    /// Accept any SSH host key
    pub insecure_ignore_host_key: bool,
    /// Accept any TLS certificate
    pub insecure_skip_tls_verify: bool,
}

impl AuthConfig {
    /// Layer `overrides` on top of `self`, field by field.
    ///
    /// Set values in `overrides` replace ours; a bypass toggle is on when
    /// either side turns it on.
    pub fn overridden_by(self, overrides: AuthConfig) -> AuthConfig {
        AuthConfig {
            username: overrides.username.or(self.username),
            password: overrides.password.or(self.password),
            private_key: overrides.private_key.or(self.private_key),
            private_key_file: overrides.private_key_file.or(self.private_key_file),
            insecure_ignore_host_key: self.insecure_ignore_host_key
                || overrides.insecure_ignore_host_key,
            insecure_skip_tls_verify: self.insecure_skip_tls_verify
                || overrides.insecure_skip_tls_verify,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .field("private_key", &self.private_key.as_ref().map(|_| REDACTED))
            .field("private_key_file", &self.private_key_file)
            .field("insecure_ignore_host_key", &self.insecure_ignore_host_key)
            .field("insecure_skip_tls_verify", &self.insecure_skip_tls_verify)
            .finish()
    }
}

/// Where SSH key material lives.
#[derive(Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Key text held in memory.
    Memory(String),
    /// Key file on disk (already validated).
    File(PathBuf),
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Memory(_) => f.debug_tuple("Memory").field(&REDACTED).finish(),
            KeySource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// The credential offered to a remote.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Nothing configured; libgit2 defaults apply.
    None,
    /// SSH private key.
    Key(KeySource),
    /// HTTP basic auth.
    BasicAuth { username: String, password: String },
}

impl Credential {
    /// Short name of the variant, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            Credential::None => "none",
            Credential::Key(_) => "ssh-key",
            Credential::BasicAuth { .. } => "basic-auth",
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::None => write!(f, "None"),
            Credential::Key(source) => f.debug_tuple("Key").field(source).finish(),
            Credential::BasicAuth { username, .. } => f
                .debug_struct("BasicAuth")
                .field("username", username)
                .field("password", &REDACTED)
                .finish(),
        }
    }
}

/// Verification toggles applied to every transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportOptions {
    /// Accept any SSH host key.
    pub insecure_ignore_host_key: bool,
    /// Accept any TLS certificate.
    pub insecure_skip_tls_verify: bool,
}

/// Resolved authentication handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auth {
    pub credential: Credential,
    pub transport: TransportOptions,
}

impl Default for Auth {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl Auth {
    /// No credential, full verification.
    pub fn anonymous() -> Self {
        Self {
            credential: Credential::None,
            transport: TransportOptions::default(),
        }
    }

    /// Resolve raw inputs into one credential.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MalformedKey`] / [`AuthError::EncryptedKey`] if any
    ///   supplied key is unusable
    /// - [`AuthError::KeyFileUnreadable`] if the key file cannot be read
    pub fn resolve(config: &AuthConfig) -> Result<Self, AuthError> {
        let mut credential = Credential::None;

        if let Some(text) = config.private_key.as_deref().filter(|k| !k.is_empty()) {
            key::validate_private_key(text, "inline private key")?;
            credential = Credential::Key(KeySource::Memory(text.to_string()));
        }

        if let Some(path) = config
            .private_key_file
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
        {
            let path = expand_home(path);
            let text = fs::read_to_string(&path).map_err(|e| AuthError::KeyFileUnreadable {
                path: path.clone(),
                source: e,
            })?;
            key::validate_private_key(&text, &path.display().to_string())?;
            credential = Credential::Key(KeySource::File(path));
        }

        let username = config.username.as_deref().filter(|u| !u.is_empty());
        let password = config.password.as_deref().filter(|p| !p.is_empty());
        match (username, password) {
            (Some(username), Some(password)) => {
                credential = Credential::BasicAuth {
                    username: username.to_string(),
                    password: password.to_string(),
                };
            }
            (Some(username), None) => {
                tracing::warn!(username, "username given without a password, ignoring it");
            }
            (None, Some(_)) => {
                tracing::warn!("password given without a username, ignoring it");
            }
            (None, None) => {}
        }

        let transport = TransportOptions {
            insecure_ignore_host_key: config.insecure_ignore_host_key,
            insecure_skip_tls_verify: config.insecure_skip_tls_verify,
        };

        tracing::debug!(
            credential = credential.kind(),
            insecure_ignore_host_key = transport.insecure_ignore_host_key,
            insecure_skip_tls_verify = transport.insecure_skip_tls_verify,
            "resolved credentials"
        );

        Ok(Self {
            credential,
            transport,
        })
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
