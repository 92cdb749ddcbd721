//! Turns a raw folder listing into render-ready file records.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use crate::format::mime_type_for_name;
use crate::models::{file_extension, FileRecord, StatsSnapshot};
use crate::storage::{RawEntry, StorageBackend, StorageResult};
use crate::util::coerce_non_negative;

/// Marker object Supabase keeps in otherwise empty folders.
const FOLDER_PLACEHOLDER: &str = ".emptyFolderPlaceholder";
const ADDED_ON_KEY: &str = "Added on";
const NO_EXTENSION: &str = "none";

/// Why a single listing entry could not become a [`FileRecord`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("entry is not a JSON object")]
    NotAnObject,
    #[error("entry has no usable name")]
    MissingName,
}

/// Fetch and normalize the files in `namespace`.
///
/// Order is whatever the backend returned. Entries that fail to normalize
/// are logged and skipped.
pub async fn list_files<S: StorageBackend>(
    storage: &S,
    access_token: &str,
    namespace: &str,
) -> StorageResult<Vec<FileRecord>> {
    let entries = storage.list(access_token, namespace).await?;
    Ok(reconcile(namespace, &entries))
}

pub fn reconcile(namespace: &str, entries: &[RawEntry]) -> Vec<FileRecord> {
    entries
        .iter()
        .filter_map(|entry| match normalize_entry(namespace, entry) {
            Ok(record) if record.name == FOLDER_PLACEHOLDER => None,
            Ok(record) => Some(record),
            Err(error) => {
                let name = entry.get("name").and_then(Value::as_str).unwrap_or("unknown");
                tracing::warn!(namespace, name, "Skipping listing entry: {}", error);
                None
            }
        })
        .collect()
}

pub fn normalize_entry(
    namespace: &str,
    entry: &RawEntry,
) -> Result<FileRecord, NormalizationError> {
    let object = entry.as_object().ok_or(NormalizationError::NotAnObject)?;
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .ok_or(NormalizationError::MissingName)?
        .to_string();

    let size_bytes = object
        .get("metadata")
        .and_then(|metadata| metadata.get("size"))
        .and_then(coerce_non_negative)
        .unwrap_or(0);

    Ok(FileRecord {
        mime_type: mime_type_for_name(&name),
        remote_path: format!("{namespace}/{name}"),
        created_at: added_on(object),
        size_bytes,
        name,
    })
}

/// Epoch seconds from `"Added on"`. Missing or unusable values are 0.
fn added_on(object: &serde_json::Map<String, Value>) -> i64 {
    object
        .get(ADDED_ON_KEY)
        .and_then(coerce_non_negative)
        .and_then(|seconds| i64::try_from(seconds).ok())
        .unwrap_or(0)
}

/// Summarize a listing. Ties for the most common extension go to the one
/// seen first.
pub fn compute_stats(records: &[FileRecord]) -> StatsSnapshot {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        let extension = file_extension(&record.name);
        let count = counts.entry(extension.clone()).or_insert(0);
        if *count == 0 {
            order.push(extension);
        }
        *count += 1;
    }

    let mut most_common: Option<(&str, usize)> = None;
    for extension in &order {
        let count = counts.get(extension).copied().unwrap_or(0);
        if most_common.map_or(true, |(_, best)| count > best) {
            most_common = Some((extension.as_str(), count));
        }
    }

    let most_common_extension = match most_common {
        Some((extension, _)) if !extension.is_empty() => extension.to_string(),
        _ => NO_EXTENSION.to_string(),
    };

    StatsSnapshot {
        total_files: records.len(),
        total_bytes: records
            .iter()
            .fold(0u64, |total, record| total.saturating_add(record.size_bytes)),
        most_common_extension,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn records(names: &[&str]) -> Vec<FileRecord> {
        let entries = names
            .iter()
            .map(|name| json!({ "name": name, "metadata": { "size": 10 } }))
            .collect::<Vec<_>>();
        reconcile("alice", &entries)
    }

    #[test]
    fn normalizes_string_metadata() {
        let entry = json!({
            "name": "report.pdf",
            "metadata": { "size": "512" },
            "Added on": "1700000000",
        });
        let record = normalize_entry("alice", &entry).unwrap();
        assert_eq!(
            record,
            FileRecord {
                name: "report.pdf".to_string(),
                size_bytes: 512,
                mime_type: "application/pdf".to_string(),
                created_at: 1_700_000_000,
                remote_path: "alice/report.pdf".to_string(),
            }
        );
    }

    #[test]
    fn missing_metadata_defaults_to_zero() {
        let record = normalize_entry("alice", &json!({ "name": "blob" })).unwrap();
        assert_eq!(record.size_bytes, 0);
        assert_eq!(record.created_at, 0);
        assert_eq!(record.mime_type, "application/octet-stream");
    }

    #[test]
    fn unusable_values_default_to_zero() {
        let entry = json!({
            "name": "a.txt",
            "metadata": { "size": "big" },
            "Added on": { "when": "yesterday" },
            "created_at": "2024-01-01T00:00:00Z",
        });
        let record = normalize_entry("alice", &entry).unwrap();
        assert_eq!(record.size_bytes, 0);
        assert_eq!(record.created_at, 0);

        let entry = json!({ "name": "a.txt", "metadata": null, "Added on": "1.7e9" });
        let record = normalize_entry("alice", &entry).unwrap();
        assert_eq!(record.created_at, 1_700_000_000);
    }

    #[test]
    fn backend_created_at_is_not_added_on() {
        let entry = json!({
            "name": "a.txt",
            "created_at": "2023-11-14T22:13:20.000Z",
            "metadata": { "size": 3 },
        });
        assert_eq!(normalize_entry("alice", &entry).unwrap().created_at, 0);

        let entry = json!({ "name": "a.txt", "Added on": null });
        assert_eq!(normalize_entry("alice", &entry).unwrap().created_at, 0);
    }

    #[test]
    fn malformed_entry_does_not_hide_siblings() {
        let entries = vec![
            json!({ "name": "first.txt", "metadata": { "size": 1 } }),
            json!({ "metadata": { "size": 2 } }),
            json!("not-an-object"),
            json!({ "name": 42 }),
            json!({ "name": "last.txt", "metadata": { "size": 3 } }),
        ];
        let names = reconcile("alice", &entries)
            .into_iter()
            .map(|record| record.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["first.txt", "last.txt"]);
    }

    #[test]
    fn placeholder_entries_are_not_files() {
        let names = records(&[".emptyFolderPlaceholder", "b.txt"])
            .into_iter()
            .map(|record| record.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["b.txt"]);
    }

    #[test]
    fn preserves_backend_order() {
        let names = records(&["zeta.txt", "alpha.txt", "mid.txt"])
            .into_iter()
            .map(|record| record.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["zeta.txt", "alpha.txt", "mid.txt"]);
    }

    #[test]
    fn stats_for_empty_listing() {
        assert_eq!(
            compute_stats(&[]),
            StatsSnapshot {
                total_files: 0,
                total_bytes: 0,
                most_common_extension: "none".to_string(),
            }
        );
    }

    #[test]
    fn stats_pick_most_common_extension() {
        let stats = compute_stats(&records(&["a.txt", "b.txt", "c.jpg"]));
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_bytes, 30);
        assert_eq!(stats.most_common_extension, ".txt");
    }

    #[test]
    fn stats_ties_go_to_first_seen() {
        let stats = compute_stats(&records(&["a.JPG", "b.txt", "c.txt", "d.jpg"]));
        assert_eq!(stats.most_common_extension, ".jpg");
    }

    #[test]
    fn stats_without_extensions_report_none() {
        let stats = compute_stats(&records(&["README", "LICENSE", "a.md"]));
        assert_eq!(stats.most_common_extension, "none");
    }
}
