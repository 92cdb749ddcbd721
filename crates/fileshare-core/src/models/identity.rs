//! Signed-in identity model

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// The authenticated user of the current session.
///
/// Lives only in memory for the lifetime of the process.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// Auth provider user id.
    pub user_id: String,
    /// Account email; its local part names the storage folder.
    pub email: String,
    /// Bearer token for authenticated storage calls.
    #[serde(skip)]
    pub access_token: String,
    /// Token used by the provider to renew the session.
    #[serde(skip)]
    pub refresh_token: String,
    /// Sign-in time (Unix seconds).
    pub signed_in_at: i64,
    /// Access token expiry reported by the provider (Unix seconds).
    pub expires_at: i64,
}

impl Identity {
    /// Storage folder owned by this identity.
    pub fn namespace(&self) -> Result<String> {
        namespace_of(&self.email)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Identity")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("signed_in_at", &self.signed_in_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Derive the per-user folder name: everything before the first `@`.
pub fn namespace_of(email: &str) -> Result<String> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, _)) if !local.is_empty() => Ok(local.to_string()),
        Some(_) => Err(Error::InvalidIdentity(format!(
            "email '{email}' has an empty local part"
        ))),
        None => Err(Error::InvalidIdentity(format!(
            "email '{email}' does not contain '@'"
        ))),
    }
}
