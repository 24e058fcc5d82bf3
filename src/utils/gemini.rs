use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::StylistError;
use crate::models::{AspectRatio, GenerationRequest, GenerationResult, ImageRecord};
use crate::utils::settings::Settings;

pub const TRY_ON_PROMPT: &str = "Generate an image of the character from the first image wearing the clothes from the second image. The final image should only show the character wearing the clothes, maintaining the character's original pose and background as much as possible. Focus on a realistic depiction of the clothing on the character.";

/// Instruction text sent along with the image to edit.
pub fn edit_prompt(instruction: &str, aspect_ratio: AspectRatio) -> String {
    let mut prompt = format!(
        "As an expert photo editor, please edit the following image based on this instruction: \"{}\". It's crucial to maintain the original image's overall style, quality, and composition, applying only the specific change requested.",
        instruction
    );

    if aspect_ratio != AspectRatio::Original {
        prompt.push_str(&format!(
            " The final output image must have a {} aspect ratio.",
            aspect_ratio.as_str()
        ));
    }

    prompt.push_str(" The output should be the final edited image.");
    prompt
}

// Wire types of the `generateContent` REST call. Only the fields this
// application reads or writes are modelled.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    #[serde(default)]
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    fn image(record: &ImageRecord) -> Self {
        Part {
            inline_data: Some(Blob {
                mime_type: record.mime_type.clone(),
                data: record.base64.clone(),
            }),
            text: None,
        }
    }

    fn text(text: impl Into<String>) -> Self {
        Part {
            inline_data: None,
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// Builds the provider request: inline images first, then the instruction.
pub fn build_request(request: &GenerationRequest) -> GenerateContentRequest {
    let parts = match request {
        GenerationRequest::Edit {
            image,
            instruction,
            aspect_ratio,
        } => vec![Part::image(image), Part::text(edit_prompt(instruction, *aspect_ratio))],
        GenerationRequest::TryOn {
            character,
            clothing,
        } => vec![
            Part::image(character),
            Part::image(clothing),
            Part::text(TRY_ON_PROMPT),
        ],
    };

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        generation_config: GenerationConfig {
            response_modalities: vec!["IMAGE".to_string()],
        },
    }
}

/// Takes the first inline image of the first candidate; everything else is
/// ignored.
pub fn extract_image(response: &GenerateContentResponse) -> Result<GenerationResult, StylistError> {
    let Some(candidate) = response.candidates.first() else {
        let provider_text = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
            .map(|reason| format!("Request blocked ({})", reason));
        return Err(StylistError::NoImageInResponse { provider_text });
    };

    let parts = candidate
        .content
        .as_ref()
        .map(|c| c.parts.as_slice())
        .unwrap_or_default();

    if let Some(blob) = parts.iter().find_map(|p| p.inline_data.as_ref()) {
        return Ok(GenerationResult::from_base64_png(&blob.data));
    }

    let text: Vec<&str> = parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    let provider_text = if text.is_empty() {
        candidate
            .finish_reason
            .as_ref()
            .filter(|reason| reason.as_str() != "STOP")
            .map(|reason| format!("Generation stopped ({})", reason))
    } else {
        Some(text.join(" "))
    };

    Err(StylistError::NoImageInResponse { provider_text })
}

/// Client for the provider's image generation endpoint.
///
/// Calls are never cached; the provider is non-deterministic and repeating a
/// request is expected to give a different image.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: settings.generate_content_url(),
        }
    }

    pub async fn edit_image(
        &self,
        image: &ImageRecord,
        instruction: &str,
        api_key: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<GenerationResult, StylistError> {
        let request = GenerationRequest::Edit {
            image: image.clone(),
            instruction: instruction.to_string(),
            aspect_ratio,
        };
        self.generate(&request, api_key).await
    }

    pub async fn try_on(
        &self,
        character: &ImageRecord,
        clothing: &ImageRecord,
        api_key: &str,
    ) -> Result<GenerationResult, StylistError> {
        let request = GenerationRequest::TryOn {
            character: character.clone(),
            clothing: clothing.clone(),
        };
        self.generate(&request, api_key).await
    }

    /// Runs one generation. Fails with `MissingCredential` before touching
    /// the network when the key is blank.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        api_key: &str,
    ) -> Result<GenerationResult, StylistError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(StylistError::MissingCredential);
        }

        let body = build_request(request);
        info!("Requesting {} generation", request.mode());
        debug!("POST {}", self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("Provider returned {}", status);
            return Err(StylistError::NetworkOrProviderFailure(if text.trim().is_empty() {
                format!("Provider request failed with status {}", status)
            } else {
                text
            }));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let result = extract_image(&parsed)?;
        info!("Generation finished ({} bytes of data URI)", result.data_uri.len());
        Ok(result)
    }
}
