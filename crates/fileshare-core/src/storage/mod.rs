//! Object storage contract and the Supabase Storage client.

mod supabase;

use std::future::Future;

use thiserror::Error;

pub use supabase::{normalize_storage_url, SupabaseStorageClient};

/// Bucket used when none is configured.
pub const DEFAULT_BUCKET: &str = "fileuploads";

/// One untyped entry of a folder listing, exactly as the backend sent it.
///
/// Expected to carry `name`, `metadata.size` and `"Added on"`, any of which
/// may be missing or of the wrong type.
pub type RawEntry = serde_json::Value;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("Invalid object path: {0}")]
    InvalidPath(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Storage {operation} failed: {message}")]
    Api {
        operation: &'static str,
        message: String,
    },
    #[error("Storage rejected the session: {0}")]
    Unauthorized(String),
}

impl StorageError {
    /// Whether the backend refused the caller's credentials.
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Bytes fetched from storage plus the content type the backend reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedObject {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Bucket-scoped storage operations consumed by the listing and actions.
///
/// Every authenticated call receives the access token explicitly so a caller
/// can read its session once per action.
pub trait StorageBackend {
    /// Store `content` at `path`, replacing any existing object.
    fn upload(
        &self,
        access_token: &str,
        path: &str,
        content: &[u8],
        content_type: &str,
    ) -> impl Future<Output = StorageResult<()>> + Send;

    /// List the entries directly under `folder_prefix`, in backend order.
    fn list(
        &self,
        access_token: &str,
        folder_prefix: &str,
    ) -> impl Future<Output = StorageResult<Vec<RawEntry>>> + Send;

    /// Fetchable URL for `path`. Pure; never fails.
    fn public_url(&self, path: &str) -> String;

    fn remove(
        &self,
        access_token: &str,
        paths: &[String],
    ) -> impl Future<Output = StorageResult<()>> + Send;

    fn download(
        &self,
        access_token: &str,
        path: &str,
    ) -> impl Future<Output = StorageResult<DownloadedObject>> + Send;
}
