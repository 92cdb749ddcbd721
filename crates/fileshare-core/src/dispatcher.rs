//! User actions against the storage backend.
//!
//! Mutating actions never refresh the listing themselves; the caller runs
//! [`ActionDispatcher::refresh`] when it wants fresh data.

use crate::auth::AuthBackend;
use crate::format::mime_type_for_name;
use crate::listing::list_files;
use crate::models::FileRecord;
use crate::preview::{resolve_preview, PreviewDescriptor};
use crate::session::SessionStore;
use crate::storage::{DownloadedObject, StorageBackend, StorageResult};
use crate::{Error, Result};

pub struct ActionDispatcher<S: StorageBackend> {
    storage: S,
}

impl<S: StorageBackend> ActionDispatcher<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Upload one file to `{namespace}/{file_name}`, overwriting any file of
    /// the same name. The content type is guessed from the name when absent.
    /// Returns the object path.
    pub async fn upload<A: AuthBackend>(
        &self,
        session: &mut SessionStore<A>,
        file_name: &str,
        content: &[u8],
        mime_type: Option<&str>,
    ) -> Result<String> {
        let file_name = validate_file_name(file_name)?;
        let snapshot = session.snapshot()?;
        let path = format!("{}/{file_name}", snapshot.namespace);
        let content_type = mime_type
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map_or_else(|| mime_type_for_name(file_name), ToString::to_string);

        tracing::debug!(path = %path, content_type = %content_type, "Uploading");
        let result = self
            .storage
            .upload(&snapshot.access_token, &path, content, &content_type)
            .await;
        settle(session, result)?;

        tracing::info!(path = %path, bytes = content.len(), "Uploaded file");
        Ok(path)
    }

    /// Mark `file_name` as awaiting delete confirmation. Idempotent.
    pub fn request_delete<A: AuthBackend>(
        &self,
        session: &mut SessionStore<A>,
        file_name: &str,
    ) -> Result<()> {
        session.snapshot()?;
        session.confirmations_mut().request(file_name);
        Ok(())
    }

    /// Clear a pending delete. Idempotent.
    pub fn cancel_delete<A: AuthBackend>(&self, session: &mut SessionStore<A>, file_name: &str) {
        session.confirmations_mut().reset(file_name);
    }

    /// Delete a file whose delete was requested earlier.
    ///
    /// The pending flag is cleared whether or not the backend call succeeds.
    pub async fn confirm_delete<A: AuthBackend>(
        &self,
        session: &mut SessionStore<A>,
        file_name: &str,
    ) -> Result<()> {
        if !session.confirmations().is_pending(file_name) {
            return Err(Error::InvalidInput(format!(
                "No pending delete for '{file_name}'"
            )));
        }

        let snapshot = match session.snapshot() {
            Ok(snapshot) => snapshot,
            Err(error) => {
                session.confirmations_mut().reset(file_name);
                return Err(error);
            }
        };
        let path = format!("{}/{file_name}", snapshot.namespace);

        let result = self
            .storage
            .remove(&snapshot.access_token, std::slice::from_ref(&path))
            .await;
        session.confirmations_mut().reset(file_name);
        settle(session, result)?;

        tracing::info!(path = %path, "Deleted file");
        Ok(())
    }

    /// Fetch the current listing. The only way the visible listing changes.
    ///
    /// Pending confirmations for files that are no longer listed are dropped.
    pub async fn refresh<A: AuthBackend>(
        &self,
        session: &mut SessionStore<A>,
    ) -> Result<Vec<FileRecord>> {
        let snapshot = session.snapshot()?;
        let result = list_files(&self.storage, &snapshot.access_token, &snapshot.namespace).await;
        let records = settle(session, result)?;

        let pruned = session.confirmations_mut().retain_listed(&records);
        if pruned > 0 {
            tracing::debug!(pruned, "Dropped confirmations for files no longer listed");
        }
        tracing::debug!(namespace = %snapshot.namespace, files = records.len(), "Refreshed listing");
        Ok(records)
    }

    pub async fn download<A: AuthBackend>(
        &self,
        session: &mut SessionStore<A>,
        file_name: &str,
    ) -> Result<DownloadedObject> {
        let file_name = validate_file_name(file_name)?;
        let snapshot = session.snapshot()?;
        let path = format!("{}/{file_name}", snapshot.namespace);
        let result = self.storage.download(&snapshot.access_token, &path).await;
        settle(session, result)
    }

    pub fn public_url(&self, record: &FileRecord) -> String {
        self.storage.public_url(&record.remote_path)
    }

    pub fn preview(&self, record: &FileRecord) -> PreviewDescriptor {
        resolve_preview(&self.public_url(record), &record.mime_type, &record.name)
    }
}

/// Convert a storage result, signing the session out when the backend
/// rejected its credentials.
fn settle<T, A: AuthBackend>(session: &mut SessionStore<A>, result: StorageResult<T>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(error) if error.is_unauthorized() => {
            let reason = error.to_string();
            session.expire(&reason);
            Err(Error::SessionExpired(reason))
        }
        Err(error) => Err(error.into()),
    }
}

fn validate_file_name(file_name: &str) -> Result<&str> {
    let trimmed = file_name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("File name cannot be empty".to_string()));
    }
    if trimmed.contains('/') || trimmed == "." || trimmed == ".." {
        return Err(Error::InvalidInput(format!(
            "File name '{trimmed}' must not contain path separators"
        )));
    }
    Ok(trimmed)
}
