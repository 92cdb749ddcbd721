//! File listing models

use chrono::DateTime;
use serde::Serialize;

use crate::format::{classify_mime, format_size, IconCategory};

/// One file in the user's storage folder, as shown in the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// File name, unique within the folder.
    pub name: String,
    /// Size in bytes (0 when the backend did not report a usable value).
    pub size_bytes: u64,
    /// Content type guessed from the name extension.
    pub mime_type: String,
    /// Creation time (Unix seconds, 0 when unknown).
    pub created_at: i64,
    /// Object path inside the bucket: `{namespace}/{name}`.
    pub remote_path: String,
}

impl FileRecord {
    /// Lower-cased extension including the leading dot, or `""`.
    ///
    /// Leading dots of hidden files do not start an extension.
    pub fn extension(&self) -> String {
        file_extension(&self.name)
    }

    pub fn display_size(&self) -> String {
        format_size(self.size_bytes)
    }

    /// `YYYY-MM-DD HH:MM` in UTC, or `"Unknown date"`.
    pub fn last_modified(&self) -> String {
        DateTime::from_timestamp(self.created_at, 0).map_or_else(
            || "Unknown date".to_string(),
            |timestamp| timestamp.format("%Y-%m-%d %H:%M").to_string(),
        )
    }

    pub fn icon_category(&self) -> IconCategory {
        classify_mime(&self.mime_type)
    }
}

/// Aggregate numbers for the stats view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub total_files: usize,
    pub total_bytes: u64,
    /// Most frequent extension, or `"none"`.
    pub most_common_extension: String,
}

pub(crate) fn file_extension(name: &str) -> String {
    let Some(index) = name.rfind('.') else {
        return String::new();
    };
    if name[..index].chars().all(|ch| ch == '.') {
        return String::new();
    }
    name[index..].to_lowercase()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(name: &str, created_at: i64) -> FileRecord {
        FileRecord {
            name: name.to_string(),
            size_bytes: 2048,
            mime_type: "text/plain".to_string(),
            created_at,
            remote_path: format!("alice/{name}"),
        }
    }

    #[test]
    fn extension_matches_last_dot() {
        assert_eq!(file_extension("a.TXT"), ".txt");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension("README"), "");
        assert_eq!(file_extension(".bashrc"), "");
        assert_eq!(file_extension("trailing."), ".");
    }

    #[test]
    fn last_modified_renders_utc_minutes() {
        assert_eq!(record("a.txt", 1_700_000_000).last_modified(), "2023-11-14 22:13");
        assert_eq!(record("a.txt", 0).last_modified(), "1970-01-01 00:00");
    }

    #[test]
    fn display_helpers() {
        let file = record("a.txt", 0);
        assert_eq!(file.display_size(), "2.0 KB");
        assert_eq!(file.icon_category(), IconCategory::Text);
    }
}
