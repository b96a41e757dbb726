//! git::transport
//!
//! Turns a resolved [`Auth`] into libgit2 remote callbacks.
//!
//! # Credentials
//!
//! libgit2 calls the credentials callback again after every rejected
//! attempt. Each configured credential gets [`MAX_CREDENTIAL_ATTEMPTS`]
//! tries before the callback reports failure, so a wrong password ends the
//! clone instead of looping.
//!
//! With no credential configured, SSH remotes use the SSH agent and other
//! transports use libgit2's default credential.
//!
//! # Certificates
//!
//! The certificate callback accepts the peer outright only when the matching
//! bypass toggle is set; otherwise libgit2's own verification decides.

use git2::{CertificateCheckStatus, Cred, CredentialType, RemoteCallbacks};

use crate::auth::{Auth, Credential, KeySource};

/// Username for SSH when the URL does not carry one.
pub const DEFAULT_SSH_USER: &str = "git";

/// Credential attempts allowed per clone.
pub const MAX_CREDENTIAL_ATTEMPTS: usize = 1;

/// Build the callbacks used for fetching from a remote.
pub(crate) fn remote_callbacks(auth: &Auth) -> RemoteCallbacks<'_> {
    let mut callbacks = RemoteCallbacks::new();
    let mut attempts = 0usize;

    callbacks.credentials(move |url, username_from_url, allowed| {
        let username = username_from_url.unwrap_or(DEFAULT_SSH_USER);

        // SSH asks for the username on its own before the real credential
        if allowed.contains(CredentialType::USERNAME) {
            return Cred::username(username);
        }

        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str(&format!(
                "authentication failed for {url} using {} credentials",
                auth.credential.kind()
            )));
        }

        tracing::debug!(
            url,
            attempt = attempts,
            credential = auth.credential.kind(),
            "supplying credentials"
        );

        match &auth.credential {
            Credential::None if allowed.contains(CredentialType::SSH_KEY) => {
                Cred::ssh_key_from_agent(username)
            }
            Credential::None => Cred::default(),
            Credential::Key(KeySource::Memory(text)) => {
                Cred::ssh_key_from_memory(username, None, text, None)
            }
            Credential::Key(KeySource::File(path)) => Cred::ssh_key(username, None, path, None),
            Credential::BasicAuth { username, password } => {
                Cred::userpass_plaintext(username, password)
            }
        }
    });

    let transport = auth.transport;
    callbacks.certificate_check(move |cert, host| {
        let bypass = if cert.as_hostkey().is_some() {
            transport.insecure_ignore_host_key
        } else {
            transport.insecure_skip_tls_verify
        };

        if bypass {
            tracing::warn!(host, "certificate verification skipped");
            Ok(CertificateCheckStatus::CertificateOk)
        } else {
            Ok(CertificateCheckStatus::CertificatePassthrough)
        }
    });

    callbacks
}
