use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::StylistError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Edit,
    TryOn,
}

impl std::fmt::Display for AppMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppMode::Edit => write!(f, "Image Edit"),
            AppMode::TryOn => write!(f, "Virtual Try-On"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    #[default]
    Original,
    Square,
    Landscape,
    Portrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 4] = [
        AspectRatio::Original,
        AspectRatio::Square,
        AspectRatio::Landscape,
        AspectRatio::Portrait,
    ];

    /// Ratio as written into the instruction text.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Original => "original",
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Original => "Original",
            AspectRatio::Square => "Square",
            AspectRatio::Landscape => "Landscape",
            AspectRatio::Portrait => "Portrait",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded image held in memory.
///
/// Built once by file ingestion and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Raw file bytes, base64 encoded.
    pub base64: String,
    pub mime_type: String,
    /// `data:<mime>;base64,<payload>`
    pub data_url: String,
}

// The payload can be megabytes long; keep it out of logs.
impl std::fmt::Debug for ImageRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageRecord")
            .field("mime_type", &self.mime_type)
            .field("base64_len", &self.base64.len())
            .finish()
    }
}

impl ImageRecord {
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Self {
        let base64 = STANDARD.encode(bytes);
        let data_url = format!("data:{};base64,{}", mime_type, base64);
        Self {
            base64,
            mime_type: mime_type.to_string(),
            data_url,
        }
    }

    /// Decodes the displayable form back into the original file bytes.
    pub fn decode(&self) -> Result<Vec<u8>, StylistError> {
        decode_data_uri(&self.data_url)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    Edit {
        image: ImageRecord,
        instruction: String,
        aspect_ratio: AspectRatio,
    },
    TryOn {
        character: ImageRecord,
        clothing: ImageRecord,
    },
}

impl GenerationRequest {
    pub fn mode(&self) -> AppMode {
        match self {
            GenerationRequest::Edit { .. } => AppMode::Edit,
            GenerationRequest::TryOn { .. } => AppMode::TryOn,
        }
    }

    /// The image the result is compared against.
    pub fn original(&self) -> &ImageRecord {
        match self {
            GenerationRequest::Edit { image, .. } => image,
            GenerationRequest::TryOn { character, .. } => character,
        }
    }
}

/// A provider-generated image, re-encoded as a PNG data URI.
#[derive(Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub data_uri: String,
}

impl std::fmt::Debug for GenerationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationResult")
            .field("data_uri_len", &self.data_uri.len())
            .finish()
    }
}

impl GenerationResult {
    pub fn from_base64_png(payload: &str) -> Self {
        Self {
            data_uri: format!("data:image/png;base64,{}", payload),
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>, StylistError> {
        decode_data_uri(&self.data_uri)
    }
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>, StylistError> {
    let (_, payload) = uri
        .split_once(";base64,")
        .ok_or_else(|| StylistError::FileRead("not a base64 data URI".to_string()))?;
    STANDARD
        .decode(payload)
        .map_err(|e| StylistError::FileRead(format!("invalid base64 payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_record_forms_agree() {
        let bytes = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];
        let record = ImageRecord::from_bytes(&bytes, "image/png");

        assert_eq!(record.mime_type, "image/png");
        assert_eq!(record.data_url, format!("data:image/png;base64,{}", record.base64));
        assert_eq!(record.decode().unwrap(), bytes.to_vec());
    }

    #[test]
    fn test_generation_result_is_png_data_uri() {
        let result = GenerationResult::from_base64_png("aGVsbG8=");
        assert_eq!(result.data_uri, "data:image/png;base64,aGVsbG8=");
        assert_eq!(result.decode().unwrap(), b"hello".to_vec());
    }

    #[test]
    fn test_decode_rejects_plain_url() {
        let result = GenerationResult {
            data_uri: "https://example.com/a.png".to_string(),
        };
        assert!(matches!(result.decode(), Err(StylistError::FileRead(_))));
    }

    #[test]
    fn test_aspect_ratio_strings() {
        let values: Vec<&str> = AspectRatio::ALL.iter().map(|r| r.as_str()).collect();
        assert_eq!(values, vec!["original", "1:1", "16:9", "9:16"]);
        assert_eq!(AspectRatio::default(), AspectRatio::Original);
    }

    #[test]
    fn test_request_original_image() {
        let character = ImageRecord::from_bytes(b"character", "image/png");
        let clothing = ImageRecord::from_bytes(b"clothing", "image/jpeg");
        let request = GenerationRequest::TryOn {
            character: character.clone(),
            clothing,
        };
        assert_eq!(request.mode(), AppMode::TryOn);
        assert_eq!(request.original(), &character);
    }
}
