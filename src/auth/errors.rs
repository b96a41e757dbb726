//! auth::errors
//!
//! Credential resolution errors.
//!
//! # Design
//!
//! Error messages name where the key material came from (inline or a file
//! path) and what is wrong with its envelope. They never include the key
//! text or a password.
//!
//! # Example
//!
//! ```
//! use repostamp::auth::AuthError;
//!
//! let err = AuthError::MalformedKey {
//!     origin: "inline private key".to_string(),
//!     reason: "missing BEGIN line".to_string(),
//! };
//! assert!(err.to_string().contains("inline private key"));
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors from resolving credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Private key text does not look like a PEM/OpenSSH private key.
    #[error("malformed private key ({origin}): {reason}")]
    MalformedKey {
        /// Where the key came from
        origin: String,
        /// What is wrong with it
        reason: String,
    },

    /// Private key is protected by a passphrase, which is not supported.
    #[error("private key ({origin}) is passphrase-protected; passphrases are not supported")]
    EncryptedKey {
        /// Where the key came from
        origin: String,
    },

    /// Private key file could not be read.
    #[error("unable to read private key file '{path}': {source}")]
    KeyFileUnreadable {
        /// The file that was read
        path: PathBuf,
        source: std::io::Error,
    },
}
