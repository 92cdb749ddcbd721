//! Session store: the signed-in identity and pending delete confirmations.
//!
//! The store is the only owner of credentials. Callers that talk to storage
//! take a [`SessionSnapshot`] once per action instead of re-reading tokens
//! mid-call.

use std::collections::BTreeSet;

use crate::auth::{AuthBackend, AuthResult, SignUpOutcome};
use crate::models::{namespace_of, FileRecord, Identity};
use crate::util::unix_timestamp_now;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
}

/// File names whose delete is waiting for a confirm or cancel.
///
/// A name is either pending or absent; absent means "not pending".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteConfirmations {
    pending: BTreeSet<String>,
}

impl DeleteConfirmations {
    pub fn is_pending(&self, file_name: &str) -> bool {
        self.pending.contains(file_name)
    }

    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub(crate) fn request(&mut self, file_name: &str) {
        self.pending.insert(file_name.to_string());
    }

    pub(crate) fn reset(&mut self, file_name: &str) -> bool {
        self.pending.remove(file_name)
    }

    /// Drop flags for files missing from `listing`. Returns how many were dropped.
    pub(crate) fn retain_listed(&mut self, listing: &[FileRecord]) -> usize {
        let before = self.pending.len();
        self.pending
            .retain(|name| listing.iter().any(|record| &record.name == name));
        before - self.pending.len()
    }

    fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Consistent view of the credentials for one storage action.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub namespace: String,
    pub access_token: String,
}

impl std::fmt::Debug for SessionSnapshot {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SessionSnapshot")
            .field("namespace", &self.namespace)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

pub struct SessionStore<A: AuthBackend> {
    auth: A,
    identity: Option<Identity>,
    confirmations: DeleteConfirmations,
}

impl<A: AuthBackend> SessionStore<A> {
    pub const fn new(auth: A) -> Self {
        Self {
            auth,
            identity: None,
            confirmations: DeleteConfirmations {
                pending: BTreeSet::new(),
            },
        }
    }

    pub const fn state(&self) -> SessionState {
        if self.identity.is_some() {
            SessionState::LoggedIn
        } else {
            SessionState::LoggedOut
        }
    }

    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub const fn confirmations(&self) -> &DeleteConfirmations {
        &self.confirmations
    }

    pub(crate) fn confirmations_mut(&mut self) -> &mut DeleteConfirmations {
        &mut self.confirmations
    }

    /// Sign in with email and password.
    ///
    /// On failure the current state is left untouched and the provider's
    /// message is returned as-is. Signing in as a different user while
    /// already signed in drops the previous user's pending confirmations.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> AuthResult<Identity> {
        let session = self.auth.sign_in_with_password(email, password).await?;

        let email = session
            .user
            .email
            .clone()
            .unwrap_or_else(|| email.trim().to_string());
        let identity = Identity {
            user_id: session.user.id,
            email,
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            signed_in_at: unix_timestamp_now(),
            expires_at: session.expires_at,
        };

        let same_user = self
            .identity
            .as_ref()
            .is_some_and(|current| current.user_id == identity.user_id);
        if !same_user {
            self.confirmations.clear();
        }

        tracing::info!(email = %identity.email, "Signed in");
        self.identity = Some(identity.clone());
        Ok(identity)
    }

    /// Register an account. Never starts a session, even when the provider
    /// auto-confirms; the user signs in explicitly afterwards.
    pub async fn sign_up(&self, email: &str, password: &str) -> AuthResult<()> {
        match self.auth.sign_up(email, password).await? {
            SignUpOutcome::ConfirmationRequired => {
                tracing::info!("Registration pending email confirmation");
            }
            SignUpOutcome::SignedIn(_) => {
                tracing::debug!("Provider auto-confirmed registration; session not kept");
            }
        }
        Ok(())
    }

    /// Sign out. Always succeeds locally; a failing provider call is logged.
    pub async fn sign_out(&mut self) {
        if let Some(identity) = self.identity.take() {
            if let Err(error) = self.auth.sign_out(&identity.access_token).await {
                tracing::warn!("Remote sign-out failed, clearing local session anyway: {}", error);
            }
            tracing::info!(email = %identity.email, "Signed out");
        }
        self.confirmations.clear();
    }

    /// Drop the session after the backend rejected its credentials.
    pub fn expire(&mut self, reason: &str) {
        if self.identity.take().is_some() {
            tracing::warn!("Session rejected by backend, signing out: {}", reason);
        }
        self.confirmations.clear();
    }

    /// Storage folder of the signed-in user.
    pub fn namespace(&self) -> Result<String> {
        let identity = self.identity.as_ref().ok_or(Error::NotSignedIn)?;
        namespace_of(&identity.email)
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot> {
        let identity = self.identity.as_ref().ok_or(Error::NotSignedIn)?;
        Ok(SessionSnapshot {
            namespace: namespace_of(&identity.email)?,
            access_token: identity.access_token.clone(),
        })
    }
}
