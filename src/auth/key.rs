//! auth::key
//!
//! Up-front checks on SSH private key material.
//!
//! libgit2 only parses a key once a connection needs it, which is after
//! network setup and after the repository location is chosen. These checks
//! run during credential resolution so a bad key fails before any
//! repository access.
//!
//! The armor is read here; the key inside it is decoded by the crate that
//! owns the format:
//! - `OPENSSH PRIVATE KEY`: `ssh-key`
//! - `RSA PRIVATE KEY` (PKCS#1): `rsa`
//! - `PRIVATE KEY` (PKCS#8): `pkcs8` via `rsa`, with RSA keys fully decoded
//! - `EC PRIVATE KEY` (SEC1): `sec1`
//!
//! Encrypted PKCS#8 keys, legacy `Proc-Type: 4,ENCRYPTED` PEM, and encrypted
//! OpenSSH keys are rejected as passphrase-protected.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, PrivateKeyInfo};
use rsa::RsaPrivateKey;

use super::AuthError;

const OPENSSH_LABEL: &str = "OPENSSH PRIVATE KEY";
const PKCS1_LABEL: &str = "RSA PRIVATE KEY";
const PKCS8_LABEL: &str = "PRIVATE KEY";
const SEC1_LABEL: &str = "EC PRIVATE KEY";

/// Validate private key text by decoding it.
///
/// `origin` names where the key came from and is used in error messages.
pub(crate) fn validate_private_key(text: &str, origin: &str) -> Result<(), AuthError> {
    let malformed = |reason: &str| AuthError::MalformedKey {
        origin: origin.to_string(),
        reason: reason.to_string(),
    };
    let encrypted = || AuthError::EncryptedKey {
        origin: origin.to_string(),
    };

    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    let label = lines
        .next()
        .and_then(|l| l.strip_prefix("-----BEGIN "))
        .and_then(|l| l.strip_suffix("-----"))
        .ok_or_else(|| malformed("missing BEGIN line"))?
        .to_string();

    if !label.ends_with("PRIVATE KEY") {
        return Err(malformed(&format!("'{label}' is not a private key")));
    }
    if label == "ENCRYPTED PRIVATE KEY" {
        return Err(encrypted());
    }

    let end_line = format!("-----END {label}-----");
    let mut body = String::new();
    let mut terminated = false;

    for line in lines.by_ref() {
        if line == end_line {
            terminated = true;
            break;
        }
        // RFC 1421 headers, e.g. "Proc-Type: 4,ENCRYPTED"
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("Proc-Type") && value.contains("ENCRYPTED") {
                return Err(encrypted());
            }
            continue;
        }
        body.push_str(line);
    }

    if !terminated {
        return Err(malformed(&format!("missing '{end_line}'")));
    }
    if lines.next().is_some() {
        return Err(malformed("unexpected content after END line"));
    }
    if body.is_empty() {
        return Err(malformed("empty key body"));
    }

    let der = STANDARD
        .decode(body.as_bytes())
        .map_err(|_| malformed("key body is not valid base64"))?;

    match label.as_str() {
        OPENSSH_LABEL => {
            let key = ssh_key::PrivateKey::from_bytes(&der)
                .map_err(|e| malformed(&format!("invalid openssh-key-v1 key: {e}")))?;
            if key.is_encrypted() {
                return Err(encrypted());
            }
        }
        PKCS1_LABEL => {
            RsaPrivateKey::from_pkcs1_der(&der)
                .map_err(|e| malformed(&format!("invalid PKCS#1 RSA key: {e}")))?;
        }
        PKCS8_LABEL => {
            let info = PrivateKeyInfo::try_from(der.as_slice())
                .map_err(|e| malformed(&format!("invalid PKCS#8 key: {e}")))?;
            if info.algorithm.oid == rsa::pkcs1::ALGORITHM_OID {
                RsaPrivateKey::from_pkcs8_der(&der)
                    .map_err(|e| malformed(&format!("invalid PKCS#8 RSA key: {e}")))?;
            }
        }
        SEC1_LABEL => {
            sec1::EcPrivateKey::try_from(der.as_slice())
                .map_err(|e| malformed(&format!("invalid SEC1 EC key: {e}")))?;
        }
        other => {
            return Err(malformed(&format!("unsupported key type '{other}'")));
        }
    }

    Ok(())
}
