//! Supabase project configuration.
//!
//! The project URL and anon key are public values; user credentials never
//! live here.

use std::env;

use crate::auth::{AuthError, SupabaseAuthClient};
use crate::storage::{StorageError, SupabaseStorageClient, DEFAULT_BUCKET};
use crate::util::{is_http_url, normalize_text_option};
use crate::{Error, Result};

const ENV_URL: &str = "SUPABASE_URL";
const ENV_KEY: &str = "SUPABASE_KEY";
const ENV_ANON_KEY: &str = "SUPABASE_ANON_KEY";
const ENV_BUCKET: &str = "FILESHARE_BUCKET";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project base URL, without a trailing slash.
    pub url: String,
    /// Public anon key.
    pub anon_key: String,
    /// Storage bucket holding the per-user folders.
    pub bucket: String,
}

impl SupabaseConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `Ok(None)` when no Supabase variables are set.
    /// Returns an error when only a partial configuration is provided.
    pub fn from_env() -> Result<Option<Self>> {
        parse_config(|key| env::var(key).ok())
    }

    /// Load configuration, letting explicit values (command-line flags)
    /// override the environment.
    pub fn with_overrides(
        url: Option<&str>,
        anon_key: Option<&str>,
        bucket: Option<&str>,
    ) -> Result<Option<Self>> {
        parse_config(overlay(url, anon_key, bucket, |key| env::var(key).ok()))
    }

    /// Build a configuration from explicit values only.
    pub fn new(url: &str, anon_key: &str, bucket: Option<&str>) -> Result<Self> {
        parse_config(overlay(Some(url), Some(anon_key), bucket, |_| None))?
            .ok_or_else(|| Error::InvalidInput("Supabase configuration is empty".to_string()))
    }

    pub fn auth_client(&self) -> std::result::Result<SupabaseAuthClient, AuthError> {
        SupabaseAuthClient::new(&self.url, self.anon_key.clone())
    }

    pub fn storage_client(&self) -> std::result::Result<SupabaseStorageClient, StorageError> {
        SupabaseStorageClient::new(&self.url, self.anon_key.clone(), Some(&self.bucket))
    }
}

fn overlay<'a>(
    url: Option<&'a str>,
    anon_key: Option<&'a str>,
    bucket: Option<&'a str>,
    fallback: impl Fn(&str) -> Option<String> + 'a,
) -> impl Fn(&str) -> Option<String> + 'a {
    move |key| {
        let explicit = match key {
            ENV_URL => url,
            ENV_KEY => anon_key,
            ENV_BUCKET => bucket,
            _ => None,
        };
        explicit.map(ToString::to_string).or_else(|| fallback(key))
    }
}

fn parse_config(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<SupabaseConfig>> {
    let url = normalize_text_option(lookup(ENV_URL));
    let anon_key =
        normalize_text_option(lookup(ENV_KEY)).or_else(|| normalize_text_option(lookup(ENV_ANON_KEY)));
    let bucket = normalize_text_option(lookup(ENV_BUCKET));

    if url.is_none() && anon_key.is_none() && bucket.is_none() {
        return Ok(None);
    }

    let mut missing = Vec::new();
    if url.is_none() {
        missing.push(ENV_URL);
    }
    if anon_key.is_none() {
        missing.push(ENV_KEY);
    }
    let (Some(url), Some(anon_key)) = (url, anon_key) else {
        return Err(Error::InvalidInput(format!(
            "Supabase configuration is incomplete. Missing: {}",
            missing.join(", ")
        )));
    };

    if !is_http_url(&url) {
        return Err(Error::InvalidInput(format!(
            "{ENV_URL} must start with http:// or https://"
        )));
    }

    Ok(Some(SupabaseConfig {
        url: url.trim_end_matches('/').to_string(),
        anon_key,
        bucket: bucket.unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
    }))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn parse_from_map(map: &HashMap<&str, &str>) -> Result<Option<SupabaseConfig>> {
        parse_config(|key| map.get(key).map(|value| (*value).to_string()))
    }

    #[test]
    fn parse_config_none_returns_none() {
        let map = HashMap::new();
        assert!(parse_from_map(&map).unwrap().is_none());
    }

    #[test]
    fn parse_config_requires_url_and_key() {
        let mut map = HashMap::new();
        map.insert(ENV_URL, "https://demo.supabase.co");

        let err = parse_from_map(&map).unwrap_err();
        match err {
            Error::InvalidInput(message) => assert!(message.contains(ENV_KEY)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_config_defaults_bucket_and_trims_url() {
        let mut map = HashMap::new();
        map.insert(ENV_URL, " https://demo.supabase.co/ ");
        map.insert(ENV_ANON_KEY, "anon");

        let config = parse_from_map(&map).unwrap().unwrap();
        assert_eq!(config.url, "https://demo.supabase.co");
        assert_eq!(config.anon_key, "anon");
        assert_eq!(config.bucket, DEFAULT_BUCKET);
    }

    #[test]
    fn parse_config_rejects_url_without_scheme() {
        let mut map = HashMap::new();
        map.insert(ENV_URL, "demo.supabase.co");
        map.insert(ENV_KEY, "anon");

        let err = parse_from_map(&map).unwrap_err();
        match err {
            Error::InvalidInput(message) => assert!(message.contains(ENV_URL)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn overrides_win_over_lookup() {
        let mut map = HashMap::new();
        map.insert(ENV_URL, "https://env.supabase.co");
        map.insert(ENV_ANON_KEY, "env-key");
        map.insert(ENV_BUCKET, "env-bucket");

        let lookup = overlay(Some("https://flag.supabase.co"), None, None, |key| {
            map.get(key).map(|value| (*value).to_string())
        });
        let config = parse_config(lookup).unwrap().unwrap();
        assert_eq!(config.url, "https://flag.supabase.co");
        assert_eq!(config.anon_key, "env-key");
        assert_eq!(config.bucket, "env-bucket");
    }

    #[test]
    fn explicit_values_build_clients() {
        let config = SupabaseConfig::new("https://demo.supabase.co", "anon", Some("media")).unwrap();
        assert_eq!(config.bucket, "media");
        assert_eq!(
            config.auth_client().unwrap().auth_url(),
            "https://demo.supabase.co/auth/v1"
        );
        assert_eq!(config.storage_client().unwrap().bucket(), "media");
    }
}
