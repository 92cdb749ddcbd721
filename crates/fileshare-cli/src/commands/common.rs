use chrono::DateTime;
use fileshare_core::format::{classify_mime, format_size, IconCategory};
use fileshare_core::preview::PreviewDescriptor;
use fileshare_core::session::DeleteConfirmations;
use fileshare_core::{FileRecord, Identity, StatsSnapshot};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct FileListItem {
    pub name: String,
    pub size_bytes: u64,
    pub display_size: String,
    pub mime_type: String,
    pub icon: IconCategory,
    pub last_modified: String,
    pub created_at: i64,
    pub public_url: String,
    pub pending_delete: bool,
}

pub fn file_to_list_item(
    record: &FileRecord,
    public_url: String,
    pending: &DeleteConfirmations,
) -> FileListItem {
    FileListItem {
        name: record.name.clone(),
        size_bytes: record.size_bytes,
        display_size: record.display_size(),
        mime_type: record.mime_type.clone(),
        icon: record.icon_category(),
        last_modified: record.last_modified(),
        created_at: record.created_at,
        public_url,
        pending_delete: pending.is_pending(&record.name),
    }
}

pub fn format_file_lines(records: &[FileRecord], pending: &DeleteConfirmations) -> Vec<String> {
    if records.is_empty() {
        return vec!["No files yet. Upload one with `upload PATH`.".to_string()];
    }

    let name_width = records
        .iter()
        .map(|record| record.name.chars().count())
        .max()
        .unwrap_or(0);

    records
        .iter()
        .map(|record| {
            let line = format!(
                "{} {:<name_width$}  {:>10}  {}",
                record.icon_category().icon(),
                record.name,
                record.display_size(),
                record.last_modified(),
            );
            if pending.is_pending(&record.name) {
                format!("{line}  [delete? confirm/cancel]")
            } else {
                line
            }
        })
        .collect()
}

pub fn format_stats_lines(stats: &StatsSnapshot) -> Vec<String> {
    vec![
        format!("Total files: {}", stats.total_files),
        format!("Total size: {}", format_size(stats.total_bytes)),
        format!("Most common type: {}", stats.most_common_extension),
    ]
}

pub fn format_preview_lines(name: &str, preview: &PreviewDescriptor) -> Vec<String> {
    match preview {
        PreviewDescriptor::Image { url, alt } => {
            vec![format!("Image preview of {alt}"), format!("  {url}")]
        }
        PreviewDescriptor::Video { url, mime_type } => {
            vec![format!("Video player ({mime_type}) for {name}"), format!("  {url}")]
        }
        PreviewDescriptor::Audio { url, mime_type } => {
            vec![format!("Audio player ({mime_type}) for {name}"), format!("  {url}")]
        }
        PreviewDescriptor::EmbeddedDocument { url } => {
            vec![format!("Embedded document viewer for {name}"), format!("  {url}")]
        }
        PreviewDescriptor::Generic { icon } => {
            vec![format!("{} No preview available for {name}", icon.icon())]
        }
    }
}

/// Shown before an upload starts.
pub fn format_upload_details(name: &str, size_bytes: u64, content_type: Option<&str>) -> Vec<String> {
    let icon = content_type.map_or(IconCategory::Generic, classify_mime);
    vec![
        format!("{} {name}", icon.icon()),
        format!("  Size: {}", format_size(size_bytes)),
        format!("  Type: {}", content_type.unwrap_or("Unknown")),
    ]
}

pub fn format_identity_lines(identity: &Identity, namespace: &str) -> Vec<String> {
    vec![
        format!("Signed in as {}", identity.email),
        format!("  Folder: {namespace}/"),
        format!("  Since: {}", format_timestamp_utc(identity.signed_in_at)),
        format!("  Token expires: {}", format_timestamp_utc(identity.expires_at)),
    ]
}

pub fn format_timestamp_utc(timestamp_secs: i64) -> String {
    DateTime::from_timestamp(timestamp_secs, 0).map_or_else(
        || "unknown".to_string(),
        |date| date.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}
