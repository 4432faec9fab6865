//! Attachments supplied alongside a question.

use explorer_error::{UploadError, UploadErrorKind};
use std::path::Path;

/// File extensions accepted as attachments, with their MIME types.
pub const SUPPORTED_ATTACHMENTS: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("pdf", "application/pdf"),
];

/// Look up the MIME type for a file extension, case-insensitively.
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    SUPPORTED_ATTACHMENTS
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, mime)| *mime)
}

/// A file the user attached to a question.
///
/// Lives only for the duration of one request: it is transferred to the
/// remote service and then dropped.
#[derive(Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct UploadedAsset {
    /// Original file name
    name: String,
    /// MIME type, e.g. `image/png`
    mime_type: String,
    /// Raw file content
    bytes: Vec<u8>,
}

impl UploadedAsset {
    /// Creates an asset from in-memory content.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read an attachment from disk, inferring its MIME type from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`UploadErrorKind::Unsupported`] for extensions outside
    /// [`SUPPORTED_ATTACHMENTS`] and [`UploadErrorKind::Io`] when the file
    /// cannot be read.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let mime_type = mime_for_extension(extension).ok_or_else(|| {
            UploadError::new(UploadErrorKind::Unsupported(format!(
                "{} (accepted: jpg, jpeg, png, webp, pdf)",
                path.display()
            )))
        })?;

        let bytes = std::fs::read(path).map_err(|e| {
            UploadError::new(UploadErrorKind::Io(format!("{}: {}", path.display(), e)))
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        tracing::debug!(name = %name, mime_type, size = bytes.len(), "Loaded attachment");
        Ok(Self::new(name, mime_type, bytes))
    }

    /// Whether the attachment is an image.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Size of the content in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the content is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for UploadedAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedAsset")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn infers_mime_type_from_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("Chart.PNG");
        std::fs::File::create(&path)
            .and_then(|mut f| f.write_all(b"\x89PNG"))
            .expect("write png");

        let asset = UploadedAsset::from_path(&path).expect("png is accepted");
        assert_eq!(asset.name(), "Chart.PNG");
        assert_eq!(asset.mime_type(), "image/png");
        assert!(asset.is_image());
        assert_eq!(asset.len(), 4);
    }

    #[test]
    fn rejects_unsupported_extension() {
        let err = UploadedAsset::from_path("notes.docx").expect_err("docx is rejected");
        assert!(matches!(err.kind(), UploadErrorKind::Unsupported(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = UploadedAsset::from_path("/nonexistent/report.pdf").expect_err("missing");
        assert!(matches!(err.kind(), UploadErrorKind::Io(_)));
    }
}
