//! Document references and data-URL handling.
//!
//! A picker hands back either a `data:image/...;base64,...` URL or some other
//! reference (a `file://` URL or a path), which is treated as a PDF.

use std::path::Path;

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;

use crate::intake::IntakeError;

/// Prefix that marks a picker result as an image.
pub const IMAGE_PREFIX: &str = "data:image";

const BASE64_MARKER: &str = ";base64,";

/// Standard alphabet, padding optional on decode.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// The currently active document.
///
/// Only one variant can be active, so a PDF and an image can never be
/// selected at the same time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DocumentReference {
    #[default]
    None,
    Pdf(String),
    Image(String),
}

impl DocumentReference {
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub const fn is_pdf(&self) -> bool {
        matches!(self, Self::Pdf(_))
    }

    pub const fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }

    /// The raw URL or path, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Pdf(url) | Self::Image(url) => Some(url),
        }
    }

    /// Short label for the status bar.
    pub fn display_name(&self) -> String {
        match self {
            Self::None => "no document".to_string(),
            Self::Pdf(url) => {
                let path = url.strip_prefix("file://").unwrap_or(url);
                Path::new(path)
                    .file_name()
                    .map_or_else(|| path.to_string(), |n| n.to_string_lossy().to_string())
            }
            Self::Image(url) => {
                let mime = image_mime(url).unwrap_or("image");
                format!("{mime} ({} bytes encoded)", url.len())
            }
        }
    }
}

/// Result of classifying a picker value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Nothing came back (user cancelled).
    Cancelled,
    Pdf(String),
    Image(String),
}

/// Classify a picker result by its prefix.
///
/// ```
/// use docmark::reference::{classify, Selection};
///
/// assert_eq!(classify(None), Selection::Cancelled);
/// assert!(matches!(classify(Some("data:image/png;base64,AA==")), Selection::Image(_)));
/// assert!(matches!(classify(Some("file:///doc.pdf")), Selection::Pdf(_)));
/// ```
pub fn classify(value: Option<&str>) -> Selection {
    match value {
        None | Some("") => Selection::Cancelled,
        Some(url) if url.starts_with(IMAGE_PREFIX) => Selection::Image(url.to_string()),
        Some(url) => Selection::Pdf(url.to_string()),
    }
}

/// Decode the base64 payload of a data URL into raw bytes.
///
/// Everything up to and including the first `;base64,` is stripped.
///
/// ASCII whitespace inside the payload is skipped and trailing `=` padding
/// is optional.
///
/// # Errors
///
/// Returns [`IntakeError::InvalidPayload`] if the URL has no base64 marker
/// or the payload is not valid standard base64.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, IntakeError> {
    let Some(start) = url.find(BASE64_MARKER) else {
        return Err(IntakeError::InvalidPayload(
            "data URL has no ;base64, marker".to_string(),
        ));
    };
    let payload: Vec<u8> = url[start + BASE64_MARKER.len()..]
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    LENIENT
        .decode(payload)
        .map_err(|err| IntakeError::InvalidPayload(err.to_string()))
}

/// Build a `data:<mime>;base64,` URL for raw bytes.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime}{BASE64_MARKER}{}", STANDARD.encode(bytes))
}

/// The MIME type embedded in a data URL, e.g. `image/png`.
pub fn image_mime(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("data:")?;
    let end = rest.find(';')?;
    Some(&rest[..end])
}

/// Image MIME type for a file extension, or `None` for anything that should
/// be treated as a PDF.
pub fn image_mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "webp" => Some("image/webp"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_classify_image_prefix() {
        let url = "data:image/png;base64,iVBORw0KGgo=";
        assert_eq!(classify(Some(url)), Selection::Image(url.to_string()));
    }

    #[test]
    fn test_classify_non_image_is_pdf() {
        assert_eq!(
            classify(Some("file:///doc.pdf")),
            Selection::Pdf("file:///doc.pdf".to_string())
        );
        // Non-image data URLs are not images either.
        assert!(matches!(
            classify(Some("data:application/pdf;base64,JVBERi0=")),
            Selection::Pdf(_)
        ));
    }

    #[test]
    fn test_classify_empty_is_cancelled() {
        assert_eq!(classify(Some("")), Selection::Cancelled);
        assert_eq!(classify(None), Selection::Cancelled);
    }

    #[test]
    fn test_decode_png_signature() {
        let bytes = decode_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(bytes, vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn test_encoded_length_matches_decoded_length() {
        for len in [0usize, 1, 2, 3, 4, 5, 31, 256] {
            let bytes: Vec<u8> = (0..len).map(|i| (i * 7 % 251) as u8).collect();
            let url = encode_data_url("image/png", &bytes);
            let decoded = decode_data_url(&url).unwrap();
            assert_eq!(decoded.len(), len);
            assert_eq!(decoded, bytes);
        }
    }

    #[test]
    fn test_decode_rejects_missing_marker() {
        let err = decode_data_url("data:image/png,abc").unwrap_err();
        assert!(matches!(err, IntakeError::InvalidPayload(_)));
    }

    #[test]
    fn test_decode_accepts_missing_padding_and_whitespace() {
        let png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        assert_eq!(decode_data_url("data:image/png;base64,iVBORw0KGgo").unwrap(), png);
        assert_eq!(
            decode_data_url("data:image/png;base64,iVBO\nRw0K Ggo=\r\n").unwrap(),
            png
        );
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let err = decode_data_url("data:image/png;base64,@@@").unwrap_err();
        assert!(matches!(err, IntakeError::InvalidPayload(_)));
    }

    #[test]
    fn test_image_mime_extracts_type() {
        assert_eq!(image_mime("data:image/jpeg;base64,AA=="), Some("image/jpeg"));
        assert_eq!(image_mime("file:///a.pdf"), None);
    }

    #[test]
    fn test_image_mime_for_path_by_extension() {
        assert_eq!(image_mime_for_path(&PathBuf::from("scan.PNG")), Some("image/png"));
        assert_eq!(image_mime_for_path(&PathBuf::from("a.jpeg")), Some("image/jpeg"));
        assert_eq!(image_mime_for_path(&PathBuf::from("doc.pdf")), None);
        assert_eq!(image_mime_for_path(&PathBuf::from("noext")), None);
    }

    #[test]
    fn test_display_name_uses_file_name() {
        let reference = DocumentReference::Pdf("file:///tmp/report.pdf".to_string());
        assert_eq!(reference.display_name(), "report.pdf");
        assert_eq!(DocumentReference::None.display_name(), "no document");
    }
}
