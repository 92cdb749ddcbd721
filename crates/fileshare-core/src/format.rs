//! Display helpers for file sizes and content types.

use serde::Serialize;
use serde_json::Value;

use crate::util::coerce_non_negative;

/// Fallback content type for names whose extension is unknown.
pub const OCTET_STREAM: &str = "application/octet-stream";

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

/// Render a byte count as `B`, `KB`, `MB` or `GB` with one decimal place.
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else if bytes < GIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.1} GB", bytes as f64 / GIB as f64)
    }
}

/// Format a size that came from the storage backend.
///
/// The listing API may report size as a number, a numeric string, or not at
/// all; anything that does not coerce renders as `"0 B"`. Uses the same
/// [`coerce_non_negative`] as the listing reconciler, which keeps the number
/// on each record so rows render through [`format_size`].
pub fn safe_format_size(value: &Value) -> String {
    format_size(coerce_non_negative(value).unwrap_or(0))
}

/// Display category used to pick an icon for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconCategory {
    Image,
    Video,
    Audio,
    Text,
    Pdf,
    Document,
    Spreadsheet,
    Presentation,
    Archive,
    Generic,
}

impl IconCategory {
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Image => "🖼️",
            Self::Video => "🎬",
            Self::Audio => "🎵",
            Self::Text => "📝",
            Self::Pdf => "📑",
            Self::Document => "📄",
            Self::Spreadsheet => "📊",
            Self::Presentation => "📽️",
            Self::Archive => "🗜️",
            Self::Generic => "📁",
        }
    }
}

/// Classify a MIME type. First match wins, so the order below matters.
pub fn classify_mime(mime_type: &str) -> IconCategory {
    let mime_type = mime_type.trim().to_ascii_lowercase();
    let contains_any = |needles: &[&str]| needles.iter().any(|needle| mime_type.contains(needle));

    if mime_type.starts_with("image/") {
        IconCategory::Image
    } else if mime_type.starts_with("video/") {
        IconCategory::Video
    } else if mime_type.starts_with("audio/") {
        IconCategory::Audio
    } else if mime_type.starts_with("text/") {
        IconCategory::Text
    } else if contains_any(&["pdf"]) {
        IconCategory::Pdf
    } else if contains_any(&["word", "document"]) {
        IconCategory::Document
    } else if contains_any(&["excel", "spreadsheet"]) {
        IconCategory::Spreadsheet
    } else if contains_any(&["presentation", "powerpoint"]) {
        IconCategory::Presentation
    } else if contains_any(&["zip", "compressed"]) {
        IconCategory::Archive
    } else {
        IconCategory::Generic
    }
}

/// Guess a content type from the file name extension.
pub fn mime_type_for_name(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_raw()
        .map_or_else(|| OCTET_STREAM.to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn format_size_bytes_band() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1), "1 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn format_size_unit_thresholds() {
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_048_576), "1.0 MB");
        assert_eq!(format_size(1_073_741_824), "1.0 GB");
        assert_eq!(format_size(5 * 1_073_741_824), "5.0 GB");
    }

    #[test]
    fn format_size_is_monotonic_within_a_band() {
        let mut previous = 0.0_f64;
        for bytes in (1024..1_048_576).step_by(4099) {
            let rendered = format_size(bytes);
            let value: f64 = rendered.trim_end_matches(" KB").parse().unwrap();
            assert!(value >= previous, "{rendered} dropped below {previous}");
            previous = value;
        }
    }

    #[test]
    fn safe_format_size_coerces_loose_inputs() {
        assert_eq!(safe_format_size(&json!(2048)), "2.0 KB");
        assert_eq!(safe_format_size(&json!("2048")), "2.0 KB");
        assert_eq!(safe_format_size(&json!(2048.0)), "2.0 KB");
        assert_eq!(safe_format_size(&Value::Null), "0 B");
        assert_eq!(safe_format_size(&json!("abc")), "0 B");
    }

    #[test]
    fn classify_mime_follows_priority_order() {
        assert_eq!(classify_mime("image/png"), IconCategory::Image);
        assert_eq!(classify_mime("video/mp4"), IconCategory::Video);
        assert_eq!(classify_mime("audio/mpeg"), IconCategory::Audio);
        assert_eq!(classify_mime("text/plain"), IconCategory::Text);
        assert_eq!(classify_mime("application/pdf"), IconCategory::Pdf);
        assert_eq!(classify_mime("application/msword"), IconCategory::Document);
        assert_eq!(
            classify_mime("application/vnd.ms-excel"),
            IconCategory::Spreadsheet
        );
        assert_eq!(
            classify_mime("application/vnd.ms-powerpoint"),
            IconCategory::Presentation
        );
        assert_eq!(classify_mime("application/zip"), IconCategory::Archive);
        assert_eq!(classify_mime(OCTET_STREAM), IconCategory::Generic);
    }

    #[test]
    fn classify_mime_document_wins_over_later_matches() {
        // Office XML types contain "document", "spreadsheet" or "presentation"
        // and the earliest matching rule decides.
        assert_eq!(
            classify_mime("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
            IconCategory::Document
        );
    }

    #[test]
    fn mime_type_for_name_defaults_to_octet_stream() {
        assert_eq!(mime_type_for_name("notes.txt"), "text/plain");
        assert_eq!(mime_type_for_name("photo.JPG"), "image/jpeg");
        assert_eq!(mime_type_for_name("blob.unknownext"), OCTET_STREAM);
        assert_eq!(mime_type_for_name("README"), OCTET_STREAM);
    }
}
