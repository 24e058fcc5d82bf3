use thiserror::Error;

/// Failures that can reach the user.
///
/// Every variant carries plain strings so the error can travel inside UI
/// messages, which must be `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StylistError {
    #[error("File is not an image (declared type: {mime_type}).")]
    InvalidFileKind { mime_type: String },

    #[error("Failed to read file: {0}")]
    FileRead(String),

    #[error("Please add your Gemini API Key to proceed.")]
    MissingCredential,

    #[error("{}", no_image_message(.provider_text))]
    NoImageInResponse { provider_text: Option<String> },

    #[error("{0}")]
    NetworkOrProviderFailure(String),
}

fn no_image_message(provider_text: &Option<String>) -> String {
    const BASE: &str =
        "Failed to generate image from response. The model may have refused the request.";
    match provider_text {
        Some(text) if !text.trim().is_empty() => format!("{BASE} Model said: \"{}\"", text.trim()),
        _ => BASE.to_string(),
    }
}

impl From<reqwest::Error> for StylistError {
    fn from(err: reqwest::Error) -> Self {
        StylistError::NetworkOrProviderFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_image_message_includes_provider_text() {
        let err = StylistError::NoImageInResponse {
            provider_text: Some("I can't edit photos of real people.".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to generate image from response."));
        assert!(msg.ends_with("Model said: \"I can't edit photos of real people.\""));
    }

    #[test]
    fn test_no_image_message_without_provider_text() {
        let err = StylistError::NoImageInResponse {
            provider_text: Some("   ".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Failed to generate image from response. The model may have refused the request."
        );
    }
}
