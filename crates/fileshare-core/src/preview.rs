//! Preview descriptors for stored files.

use serde::Serialize;

use crate::format::{classify_mime, IconCategory};

/// How a UI should preview a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreviewDescriptor {
    Image { url: String, alt: String },
    Video { url: String, mime_type: String },
    Audio { url: String, mime_type: String },
    EmbeddedDocument { url: String },
    Generic { icon: IconCategory },
}

/// Pick the preview variant for a file.
///
/// Only an exact `application/pdf` type embeds; other document-like types
/// fall back to an icon.
pub fn resolve_preview(url: &str, mime_type: &str, name: &str) -> PreviewDescriptor {
    let category = classify_mime(mime_type);
    match category {
        IconCategory::Image => PreviewDescriptor::Image {
            url: url.to_string(),
            alt: name.to_string(),
        },
        IconCategory::Video => PreviewDescriptor::Video {
            url: url.to_string(),
            mime_type: mime_type.to_string(),
        },
        IconCategory::Audio => PreviewDescriptor::Audio {
            url: url.to_string(),
            mime_type: mime_type.to_string(),
        },
        _ if mime_type == "application/pdf" => PreviewDescriptor::EmbeddedDocument {
            url: url.to_string(),
        },
        icon => PreviewDescriptor::Generic { icon },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const URL: &str = "https://demo.supabase.co/storage/v1/object/public/fileuploads/alice/a";

    #[test]
    fn media_types_carry_url() {
        assert_eq!(
            resolve_preview(URL, "image/png", "a.png"),
            PreviewDescriptor::Image {
                url: URL.to_string(),
                alt: "a.png".to_string()
            }
        );
        assert_eq!(
            resolve_preview(URL, "video/mp4", "a.mp4"),
            PreviewDescriptor::Video {
                url: URL.to_string(),
                mime_type: "video/mp4".to_string()
            }
        );
        assert_eq!(
            resolve_preview(URL, "audio/ogg", "a.ogg"),
            PreviewDescriptor::Audio {
                url: URL.to_string(),
                mime_type: "audio/ogg".to_string()
            }
        );
    }

    #[test]
    fn only_exact_pdf_type_embeds() {
        assert_eq!(
            resolve_preview(URL, "application/pdf", "a.pdf"),
            PreviewDescriptor::EmbeddedDocument {
                url: URL.to_string()
            }
        );
        assert_eq!(
            resolve_preview(URL, "application/x-pdf", "a.pdf"),
            PreviewDescriptor::Generic {
                icon: IconCategory::Pdf
            }
        );
    }

    #[test]
    fn everything_else_is_an_icon() {
        assert_eq!(
            resolve_preview(URL, "text/plain", "a.txt"),
            PreviewDescriptor::Generic {
                icon: IconCategory::Text
            }
        );
        assert_eq!(
            resolve_preview(URL, "application/octet-stream", "a.bin"),
            PreviewDescriptor::Generic {
                icon: IconCategory::Generic
            }
        );
    }
}
