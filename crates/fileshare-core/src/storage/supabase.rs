//! Supabase Storage REST client.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use super::{
    DownloadedObject, RawEntry, StorageBackend, StorageError, StorageResult, DEFAULT_BUCKET,
};
use crate::util::{compact_text, is_http_url};

const LIST_PAGE_SIZE: usize = 100;
const UPLOAD_CACHE_CONTROL: &str = "max-age=3600";

/// Storage client bound to a single bucket.
#[derive(Clone)]
pub struct SupabaseStorageClient {
    storage_url: String,
    anon_key: String,
    bucket: String,
    client: Client,
}

impl SupabaseStorageClient {
    pub fn new(
        url: impl AsRef<str>,
        anon_key: impl Into<String>,
        bucket: Option<&str>,
    ) -> StorageResult<Self> {
        let storage_url = normalize_storage_url(url.as_ref())?;
        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(StorageError::InvalidConfiguration(
                "Supabase anon key must not be empty",
            ));
        }
        let bucket = bucket
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_BUCKET)
            .to_string();

        Ok(Self {
            storage_url,
            anon_key,
            bucket,
            client: Client::builder().build()?,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/object/{}/{}",
            self.storage_url,
            urlencoding::encode(&self.bucket),
            encode_object_path(path)
        )
    }

    fn authenticated(&self, request: RequestBuilder, access_token: &str) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
    }

    async fn list_page(
        &self,
        access_token: &str,
        prefix: &str,
        offset: usize,
    ) -> StorageResult<Vec<RawEntry>> {
        let payload = serde_json::json!({
            "prefix": prefix,
            "limit": LIST_PAGE_SIZE,
            "offset": offset,
            "sortBy": { "column": "name", "order": "asc" },
        });
        let request = self.authenticated(
            self.client
                .post(format!(
                    "{}/object/list/{}",
                    self.storage_url,
                    urlencoding::encode(&self.bucket)
                ))
                .json(&payload),
            access_token,
        );
        let response = ensure_success("list", request.send().await?).await?;
        Ok(response.json::<Vec<RawEntry>>().await?)
    }
}

impl StorageBackend for SupabaseStorageClient {
    async fn upload(
        &self,
        access_token: &str,
        path: &str,
        content: &[u8],
        content_type: &str,
    ) -> StorageResult<()> {
        let path = normalize_object_path(path)?;
        let request = self.authenticated(
            self.client
                .post(self.object_url(&path))
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .header(reqwest::header::CACHE_CONTROL, UPLOAD_CACHE_CONTROL)
                .header("x-upsert", "true")
                .body(content.to_vec()),
            access_token,
        );
        ensure_success("upload", request.send().await?).await?;
        Ok(())
    }

    async fn list(&self, access_token: &str, folder_prefix: &str) -> StorageResult<Vec<RawEntry>> {
        let prefix = folder_prefix.trim().trim_matches('/').to_string();
        let mut entries = Vec::new();
        let mut offset = 0usize;

        loop {
            let batch = self.list_page(access_token, &prefix, offset).await?;
            let count = batch.len();
            entries.extend(batch);

            if count < LIST_PAGE_SIZE {
                break;
            }
            offset += count;
        }

        Ok(entries)
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/object/public/{}/{}",
            self.storage_url,
            urlencoding::encode(&self.bucket),
            encode_object_path(path.trim().trim_matches('/'))
        )
    }

    async fn remove(&self, access_token: &str, paths: &[String]) -> StorageResult<()> {
        let prefixes = paths
            .iter()
            .map(String::as_str)
            .map(normalize_object_path)
            .collect::<StorageResult<Vec<_>>>()?;
        let request = self.authenticated(
            self.client
                .delete(format!(
                    "{}/object/{}",
                    self.storage_url,
                    urlencoding::encode(&self.bucket)
                ))
                .json(&serde_json::json!({ "prefixes": prefixes })),
            access_token,
        );
        ensure_success("remove", request.send().await?).await?;
        Ok(())
    }

    async fn download(&self, access_token: &str, path: &str) -> StorageResult<DownloadedObject> {
        let path = normalize_object_path(path)?;
        let request = self.authenticated(self.client.get(self.object_url(&path)), access_token);
        let response = ensure_success("download", request.send().await?).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned);
        let bytes = response.bytes().await?;

        Ok(DownloadedObject {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

pub fn normalize_storage_url(url: &str) -> StorageResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(StorageError::InvalidConfiguration(
            "Supabase URL must not be empty",
        ));
    }
    if !is_http_url(trimmed) {
        return Err(StorageError::InvalidConfiguration(
            "Supabase URL must include http:// or https://",
        ));
    }
    if trimmed.ends_with("/storage/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/storage/v1"))
    }
}

fn normalize_object_path(path: &str) -> StorageResult<String> {
    let path = path.trim().trim_matches('/');
    if path.is_empty() {
        return Err(StorageError::InvalidPath(
            "object path cannot be empty".to_string(),
        ));
    }
    if path.split('/').any(|segment| segment.is_empty() || segment == "..") {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(path.to_string())
}

fn encode_object_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Deserialize)]
struct StorageErrorResponse {
    error: Option<String>,
    message: Option<String>,
}

async fn ensure_success(operation: &'static str, response: Response) -> StorageResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(classify_error(operation, status, &body))
}

fn classify_error(operation: &'static str, status: StatusCode, body: &str) -> StorageError {
    let message = serde_json::from_str::<StorageErrorResponse>(body)
        .ok()
        .and_then(|payload| payload.message.or(payload.error))
        .map_or_else(
            || {
                let trimmed = compact_text(body);
                if trimmed.is_empty() {
                    format!("HTTP {}", status.as_u16())
                } else {
                    format!("{trimmed} ({})", status.as_u16())
                }
            },
            |message| format!("{} ({})", message.trim(), status.as_u16()),
        );

    // Storage reports token problems as 400 with a JWT message as well as 401.
    // A 403 alone is a row-level security denial, not a dead session.
    let lowered = message.to_ascii_lowercase();
    if status == StatusCode::UNAUTHORIZED || lowered.contains("jwt") || lowered.contains("jws") {
        StorageError::Unauthorized(message)
    } else {
        StorageError::Api { operation, message }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn client() -> SupabaseStorageClient {
        SupabaseStorageClient::new("https://demo.supabase.co/", "anon", None).unwrap()
    }

    #[test]
    fn normalize_storage_url_appends_storage_path() {
        assert_eq!(
            normalize_storage_url("https://demo.supabase.co/").unwrap(),
            "https://demo.supabase.co/storage/v1"
        );
        assert_eq!(
            normalize_storage_url("https://demo.supabase.co/storage/v1").unwrap(),
            "https://demo.supabase.co/storage/v1"
        );
        assert!(normalize_storage_url("demo.supabase.co").is_err());
    }

    #[test]
    fn client_defaults_bucket() {
        assert_eq!(client().bucket(), DEFAULT_BUCKET);
        let custom =
            SupabaseStorageClient::new("https://demo.supabase.co", "anon", Some(" media ")).unwrap();
        assert_eq!(custom.bucket(), "media");
    }

    #[test]
    fn public_url_encodes_segments() {
        assert_eq!(
            client().public_url("alice/My Photo #1.png"),
            "https://demo.supabase.co/storage/v1/object/public/fileuploads/alice/My%20Photo%20%231.png"
        );
    }

    #[test]
    fn object_paths_are_validated() {
        assert_eq!(normalize_object_path("/alice/a.txt/").unwrap(), "alice/a.txt");
        assert!(normalize_object_path("  ").is_err());
        assert!(normalize_object_path("alice/../bob/a.txt").is_err());
        assert!(normalize_object_path("alice//a.txt").is_err());
    }

    #[test]
    fn jwt_failures_are_unauthorized() {
        let error = classify_error(
            "list",
            StatusCode::BAD_REQUEST,
            r#"{"statusCode":"403","error":"Unauthorized","message":"jwt expired"}"#,
        );
        assert!(error.is_unauthorized());

        let error = classify_error("list", StatusCode::UNAUTHORIZED, "");
        assert!(error.is_unauthorized());
    }

    #[test]
    fn policy_denials_are_plain_api_errors() {
        let error = classify_error(
            "upload",
            StatusCode::FORBIDDEN,
            r#"{"statusCode":"403","error":"Unauthorized","message":"new row violates row-level security policy"}"#,
        );
        match error {
            StorageError::Api { operation, message } => {
                assert_eq!(operation, "upload");
                assert_eq!(message, "new row violates row-level security policy (403)");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    #[ignore = "Requires SUPABASE_URL, SUPABASE_KEY and FILESHARE_TEST_TOKEN plus network access"]
    async fn list_real_bucket() {
        let _ = dotenvy::dotenv();

        let config = crate::config::SupabaseConfig::from_env()
            .expect("Supabase env parsing should not error")
            .expect("Supabase config should be present");
        let token = std::env::var("FILESHARE_TEST_TOKEN").expect("test token should be set");
        let storage = config.storage_client().unwrap();

        storage
            .list(&token, "")
            .await
            .unwrap_or_else(|error| panic!("listing bucket '{}' failed: {error}", config.bucket));
    }
}
