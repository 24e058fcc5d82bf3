use std::path::Path;

use tracing::{debug, warn};

use crate::error::StylistError;
use crate::models::ImageRecord;

/// Formats the app can preview and compare, as (extension, content type).
/// The `image` crate features in Cargo.toml must cover every entry.
const SUPPORTED_FORMATS: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("jfif", "image/jpeg"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
];

/// Extensions offered by the file picker. Dropped files go through the
/// same table.
pub const PICKER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "jfif", "webp", "gif", "bmp"];

/// Content type declared for a file, derived from its extension the same way
/// desktop shells and browsers report it.
pub fn declared_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let Some(extension) = extension else {
        return "application/octet-stream";
    };

    if let Some((_, mime_type)) = SUPPORTED_FORMATS.iter().find(|(ext, _)| *ext == extension) {
        return *mime_type;
    }

    match extension.as_str() {
        "heic" => "image/heic",
        "heif" => "image/heif",
        "avif" => "image/avif",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "txt" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Whether files of `mime_type` are accepted.
pub fn is_supported(mime_type: &str) -> bool {
    SUPPORTED_FORMATS.iter().any(|(_, m)| *m == mime_type)
}

/// An accepted image: the record sent to the provider plus the raw file
/// bytes, kept for the preview.
#[derive(Debug, Clone)]
pub struct IngestedImage {
    pub record: ImageRecord,
    pub bytes: Vec<u8>,
}

/// Turns in-memory file content into an image record.
pub fn ingest_bytes(bytes: Vec<u8>, mime_type: &str) -> Result<IngestedImage, StylistError> {
    if !is_supported(mime_type) {
        return Err(StylistError::InvalidFileKind {
            mime_type: mime_type.to_string(),
        });
    }
    Ok(IngestedImage {
        record: ImageRecord::from_bytes(&bytes, mime_type),
        bytes,
    })
}

/// Reads an image file chosen in the picker or dropped on the window.
///
/// The type check runs before any read, so rejected files are never loaded.
pub async fn ingest_path(path: &Path) -> Result<IngestedImage, StylistError> {
    let mime_type = declared_mime_type(path);
    if !is_supported(mime_type) {
        warn!("Rejected {} ({})", path.display(), mime_type);
        return Err(StylistError::InvalidFileKind {
            mime_type: mime_type.to_string(),
        });
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| StylistError::FileRead(format!("{}: {}", path.display(), e)))?;
    debug!("Loaded {} ({} bytes, {})", path.display(), bytes.len(), mime_type);

    ingest_bytes(bytes, mime_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_declared_types() {
        assert_eq!(declared_mime_type(Path::new("a/photo.PNG")), "image/png");
        assert_eq!(declared_mime_type(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(declared_mime_type(Path::new("notes.txt")), "text/plain");
        assert_eq!(declared_mime_type(Path::new("no_extension")), "application/octet-stream");
    }

    #[test]
    fn test_ingest_bytes_rejects_non_images() {
        let err = ingest_bytes(b"hello".to_vec(), "text/plain").unwrap_err();
        assert_eq!(
            err,
            StylistError::InvalidFileKind {
                mime_type: "text/plain".to_string()
            }
        );
    }

    #[test]
    fn test_picker_and_drop_accept_the_same_extensions() {
        for ext in PICKER_EXTENSIONS {
            let path = PathBuf::from(format!("picture.{}", ext));
            assert!(is_supported(declared_mime_type(&path)), "{} rejected", ext);
        }
        for (ext, _) in SUPPORTED_FORMATS {
            assert!(PICKER_EXTENSIONS.contains(ext), "{} missing from picker", ext);
        }
    }

    #[tokio::test]
    async fn test_undecodable_image_types_are_rejected() {
        for name in ["scan.tiff", "logo.svg", "favicon.ico", "photo.heic"] {
            let path = PathBuf::from(format!("/definitely/missing/{}", name));
            let err = ingest_path(&path).await.unwrap_err();
            assert!(matches!(err, StylistError::InvalidFileKind { .. }), "{}", name);
        }
    }

    #[tokio::test]
    async fn test_ingest_path_round_trips_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picture.webp");
        let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        std::fs::write(&path, &bytes).unwrap();

        let ingested = ingest_path(&path).await.unwrap();
        assert_eq!(ingested.record.mime_type, "image/webp");
        assert!(ingested.record.data_url.starts_with("data:image/webp;base64,"));
        assert_eq!(ingested.record.decode().unwrap(), bytes);
        assert_eq!(ingested.bytes, bytes);
    }

    #[tokio::test]
    async fn test_ingest_path_rejects_before_reading() {
        // The file does not exist; a type failure proves nothing was read.
        let path = PathBuf::from("/definitely/missing/report.pdf");
        let err = ingest_path(&path).await.unwrap_err();
        assert!(matches!(err, StylistError::InvalidFileKind { .. }));
    }

    #[tokio::test]
    async fn test_ingest_path_read_failure() {
        let path = PathBuf::from("/definitely/missing/photo.png");
        let err = ingest_path(&path).await.unwrap_err();
        assert!(matches!(err, StylistError::FileRead(_)));
    }
}
