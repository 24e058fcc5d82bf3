use std::sync::Arc;

use ai_image_stylist::StylistError;
use ai_image_stylist::models::{AppMode, AspectRatio, GenerationRequest, GenerationResult, ImageRecord};
use ai_image_stylist::utils::comparison::{ComparisonFrames, DEFAULT_POSITION};
use ai_image_stylist::utils::error_normalizer;
use iced::widget::image::Handle;
use iced::widget::text_editor;
use tracing::{debug, info, warn};

/// Upload slots. Which ones are visible depends on the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    EditImage,
    Character,
    Clothing,
}

impl ImageSlot {
    pub fn mode(&self) -> AppMode {
        match self {
            ImageSlot::EditImage => AppMode::Edit,
            ImageSlot::Character | ImageSlot::Clothing => AppMode::TryOn,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ImageSlot::EditImage => "Upload Image to Edit",
            ImageSlot::Character => "Upload Character Image",
            ImageSlot::Clothing => "Upload Clothing Image",
        }
    }

    /// Slots shown in `mode`, primary slot first.
    pub fn for_mode(mode: AppMode) -> &'static [ImageSlot] {
        match mode {
            AppMode::Edit => &[ImageSlot::EditImage],
            AppMode::TryOn => &[ImageSlot::Character, ImageSlot::Clothing],
        }
    }
}

/// An ingested image plus the handle used for its preview.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub record: ImageRecord,
    pub preview: Handle,
}

impl UploadedImage {
    /// `bytes` are the raw file contents the record was built from.
    pub fn new(record: ImageRecord, bytes: Vec<u8>) -> Self {
        Self {
            preview: Handle::from_bytes(bytes),
            record,
        }
    }
}

/// A finished generation, decoded for display.
#[derive(Clone)]
pub struct GeneratedImage {
    pub result: GenerationResult,
    pub handle: Handle,
    pub png: Arc<Vec<u8>>,
    pub frames: Option<Arc<ComparisonFrames>>,
}

impl std::fmt::Debug for GeneratedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedImage")
            .field("bytes", &self.png.len())
            .field("comparable", &self.frames.is_some())
            .finish()
    }
}

impl GeneratedImage {
    /// Decodes the result and, when possible, lines it up with the original
    /// for the comparison slider. CPU heavy; run it off the UI thread.
    pub fn prepare(result: GenerationResult, original: &ImageRecord) -> Result<Self, StylistError> {
        let png = result.decode()?;

        let frames = match original.decode() {
            Ok(original) => match ComparisonFrames::prepare(&original, &png) {
                Ok(frames) => Some(Arc::new(frames)),
                Err(e) => {
                    warn!("Comparison view unavailable: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("Original image unavailable for comparison: {}", e);
                None
            }
        };

        Ok(Self {
            handle: Handle::from_bytes(png.clone()),
            png: Arc::new(png),
            result,
            frames,
        })
    }
}

/// Coarse state derived from the fields below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingInput,
    Ready,
    InFlight,
    Succeeded,
    Failed,
}

/// The single thing the output panel shows.
#[derive(Debug)]
pub enum OutputView<'a> {
    Loading,
    Error(&'a str),
    Placeholder,
    Result(&'a GeneratedImage),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    Started { id: u64, request: GenerationRequest },
    MissingCredential,
    NotReady,
    Busy,
}

pub struct StudioState {
    pub mode: AppMode,
    pub edit_image: Option<UploadedImage>,
    pub character_image: Option<UploadedImage>,
    pub clothing_image: Option<UploadedImage>,
    pub prompt: String,
    pub prompt_editor: text_editor::Content,
    pub aspect_ratio: AspectRatio,

    pub result: Option<GeneratedImage>,
    pub error: Option<String>,
    pub slider_position: f32,
    pub comparison_frame: Option<Handle>,

    pub dragging: bool,
    pub hovered_slot: Option<ImageSlot>,

    in_flight: Option<u64>,
    next_request_id: u64,
    abort_handle: Option<iced::task::Handle>,
    credential_requested: bool,
}

impl Default for StudioState {
    fn default() -> Self {
        Self::new()
    }
}

impl StudioState {
    pub fn new() -> Self {
        Self {
            mode: AppMode::Edit,
            edit_image: None,
            character_image: None,
            clothing_image: None,
            prompt: String::new(),
            prompt_editor: text_editor::Content::new(),
            aspect_ratio: AspectRatio::Original,
            result: None,
            error: None,
            slider_position: DEFAULT_POSITION,
            comparison_frame: None,
            dragging: false,
            hovered_slot: None,
            in_flight: None,
            next_request_id: 1,
            abort_handle: None,
            credential_requested: false,
        }
    }

    pub fn image(&self, slot: ImageSlot) -> Option<&UploadedImage> {
        match slot {
            ImageSlot::EditImage => self.edit_image.as_ref(),
            ImageSlot::Character => self.character_image.as_ref(),
            ImageSlot::Clothing => self.clothing_image.as_ref(),
        }
    }

    /// Stores, replaces or (with `None`) removes the image in `slot`.
    pub fn set_image(&mut self, slot: ImageSlot, image: Option<UploadedImage>) {
        let target = match slot {
            ImageSlot::EditImage => &mut self.edit_image,
            ImageSlot::Character => &mut self.character_image,
            ImageSlot::Clothing => &mut self.clothing_image,
        };
        *target = image;
    }

    /// Applies an edit from the prompt editor. Edits are ignored while a
    /// generation runs; cursor moves and selection still work.
    pub fn edit_prompt(&mut self, action: text_editor::Action) {
        if self.is_loading() && action.is_edit() {
            return;
        }
        self.prompt_editor.perform(action);
        self.prompt = self.prompt_editor.text().trim_end_matches('\n').to_string();
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the current mode has everything it needs to generate.
    pub fn inputs_complete(&self) -> bool {
        match self.mode {
            AppMode::Edit => self.edit_image.is_some() && !self.prompt.trim().is_empty(),
            AppMode::TryOn => self.character_image.is_some() && self.clothing_image.is_some(),
        }
    }

    /// Drives the enabled state of the Generate button.
    pub fn can_generate(&self) -> bool {
        !self.is_loading() && self.inputs_complete()
    }

    pub fn phase(&self) -> Phase {
        if self.is_loading() {
            Phase::InFlight
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.result.is_some() {
            Phase::Succeeded
        } else if self.inputs_complete() {
            Phase::Ready
        } else if self.has_any_input() {
            Phase::AwaitingInput
        } else {
            Phase::Idle
        }
    }

    fn has_any_input(&self) -> bool {
        ImageSlot::for_mode(self.mode)
            .iter()
            .any(|slot| self.image(*slot).is_some())
            || (self.mode == AppMode::Edit && !self.prompt.trim().is_empty())
    }

    /// Switches mode, clearing the previous output.
    ///
    /// A generation still running is aborted and its id retired, so a late
    /// completion cannot land in the new mode.
    pub fn set_mode(&mut self, mode: AppMode) {
        if self.in_flight.is_some() && mode != self.mode {
            info!("Mode switched during generation, discarding pending result");
            self.cancel_in_flight();
        }
        self.mode = mode;
        self.clear_output();
        debug!("Mode set to {}, phase {:?}", mode, self.phase());
    }

    /// Validates preconditions and, on success, enters the in-flight state.
    pub fn begin_generation(&mut self, api_key: &str) -> GenerateOutcome {
        if self.is_loading() {
            return GenerateOutcome::Busy;
        }

        if api_key.trim().is_empty() {
            self.result = None;
            self.comparison_frame = None;
            self.error = Some(error_normalizer::describe(&StylistError::MissingCredential));
            self.credential_requested = true;
            return GenerateOutcome::MissingCredential;
        }

        let request = match self.mode {
            AppMode::Edit => match &self.edit_image {
                Some(image) if !self.prompt.trim().is_empty() => GenerationRequest::Edit {
                    image: image.record.clone(),
                    instruction: self.prompt.clone(),
                    aspect_ratio: self.aspect_ratio,
                },
                _ => return GenerateOutcome::NotReady,
            },
            AppMode::TryOn => match (&self.character_image, &self.clothing_image) {
                (Some(character), Some(clothing)) => GenerationRequest::TryOn {
                    character: character.record.clone(),
                    clothing: clothing.record.clone(),
                },
                _ => return GenerateOutcome::NotReady,
            },
        };

        let id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight = Some(id);
        self.clear_output();

        GenerateOutcome::Started { id, request }
    }

    /// Keeps the handle used to abort the running generation task.
    pub fn track_task(&mut self, id: u64, handle: iced::task::Handle) {
        if self.in_flight == Some(id) {
            self.abort_handle = Some(handle);
        } else {
            handle.abort();
        }
    }

    /// Applies a completion. Returns `false` when it belongs to a request
    /// that is no longer current.
    pub fn finish_generation(
        &mut self,
        id: u64,
        outcome: Result<GeneratedImage, StylistError>,
    ) -> bool {
        if self.in_flight != Some(id) {
            debug!("Discarding stale generation result #{}", id);
            return false;
        }
        self.in_flight = None;
        self.abort_handle = None;

        match outcome {
            Ok(generated) => {
                info!("Generation #{} succeeded", id);
                self.error = None;
                self.comparison_frame = generated
                    .frames
                    .as_ref()
                    .map(|frames| compose_handle(frames, self.slider_position));
                self.result = Some(generated);
            }
            Err(e) => {
                let message = error_normalizer::describe(&e);
                warn!("Generation #{} failed: {}", id, message);
                self.result = None;
                self.comparison_frame = None;
                self.error = Some(message);
            }
        }
        true
    }

    /// Whether a generation attempt asked for the API key dialog since the
    /// last call. Resets the request.
    pub fn take_credential_request(&mut self) -> bool {
        std::mem::take(&mut self.credential_requested)
    }

    pub fn cancel_in_flight(&mut self) {
        if let Some(handle) = self.abort_handle.take() {
            handle.abort();
        }
        self.in_flight = None;
    }

    pub fn set_slider_position(&mut self, position: f32) {
        self.slider_position = position.clamp(0.0, 100.0);
        if let Some(frames) = self.result.as_ref().and_then(|r| r.frames.as_ref()) {
            self.comparison_frame = Some(compose_handle(frames, self.slider_position));
        }
    }

    /// What the output panel shows; exactly one variant at a time.
    pub fn output(&self) -> OutputView<'_> {
        if self.is_loading() {
            OutputView::Loading
        } else if let Some(error) = &self.error {
            OutputView::Error(error)
        } else if let Some(result) = &self.result {
            OutputView::Result(result)
        } else {
            OutputView::Placeholder
        }
    }

    /// Slot a dropped file goes to: the hovered dropzone if known, else the
    /// first empty slot of the current mode, else the primary slot.
    pub fn drop_target(&self) -> ImageSlot {
        let slots = ImageSlot::for_mode(self.mode);
        if let Some(hovered) = self.hovered_slot.filter(|s| slots.contains(s)) {
            return hovered;
        }
        slots
            .iter()
            .copied()
            .find(|slot| self.image(*slot).is_none())
            .unwrap_or(slots[0])
    }

    fn clear_output(&mut self) {
        self.result = None;
        self.error = None;
        self.comparison_frame = None;
    }
}

fn compose_handle(frames: &ComparisonFrames, position: f32) -> Handle {
    let frame = frames.compose(position);
    let (width, height) = frame.dimensions();
    Handle::from_rgba(width, height, frame.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(bytes: &[u8]) -> UploadedImage {
        UploadedImage::new(ImageRecord::from_bytes(bytes, "image/png"), bytes.to_vec())
    }

    fn generated() -> GeneratedImage {
        let result = GenerationResult::from_base64_png("aGVsbG8=");
        GeneratedImage {
            handle: Handle::from_bytes(b"hello".to_vec()),
            png: Arc::new(b"hello".to_vec()),
            result,
            frames: None,
        }
    }

    fn ready_edit_state() -> StudioState {
        let mut state = StudioState::new();
        state.set_image(ImageSlot::EditImage, Some(upload(b"photo")));
        state.prompt = "Make the sky purple".to_string();
        state
    }

    fn start(state: &mut StudioState) -> u64 {
        match state.begin_generation("key") {
            GenerateOutcome::Started { id, .. } => id,
            other => panic!("generation did not start: {:?}", other),
        }
    }

    #[test]
    fn test_edit_preconditions() {
        let mut state = StudioState::new();
        assert_eq!(state.phase(), Phase::Idle);
        assert!(!state.can_generate());

        state.set_image(ImageSlot::EditImage, Some(upload(b"photo")));
        assert_eq!(state.phase(), Phase::AwaitingInput);

        state.prompt = "   \n".to_string();
        assert!(!state.can_generate());

        state.prompt = "Add a hat".to_string();
        assert!(state.can_generate());
        assert_eq!(state.phase(), Phase::Ready);
    }

    #[test]
    fn test_try_on_needs_both_images() {
        let mut state = StudioState::new();
        state.set_mode(AppMode::TryOn);
        state.set_image(ImageSlot::Character, Some(upload(b"person")));
        assert!(!state.can_generate());
        assert_eq!(state.begin_generation("key"), GenerateOutcome::NotReady);

        state.set_image(ImageSlot::Clothing, Some(upload(b"shirt")));
        assert!(state.can_generate());
    }

    #[test]
    fn test_missing_credential_sets_error_without_starting() {
        let mut state = ready_edit_state();
        assert_eq!(state.begin_generation("  "), GenerateOutcome::MissingCredential);
        assert!(!state.is_loading());
        assert_eq!(state.phase(), Phase::Failed);
        assert_eq!(
            state.error.as_deref(),
            Some("Please add your Gemini API Key to proceed.")
        );
        assert!(state.take_credential_request());
        assert!(!state.take_credential_request());
    }

    #[test]
    fn test_started_request_carries_inputs() {
        let mut state = ready_edit_state();
        state.aspect_ratio = AspectRatio::Landscape;
        state.error = Some("old".to_string());

        match state.begin_generation("key") {
            GenerateOutcome::Started { request, .. } => {
                assert_eq!(
                    request,
                    GenerationRequest::Edit {
                        image: ImageRecord::from_bytes(b"photo", "image/png"),
                        instruction: "Make the sky purple".to_string(),
                        aspect_ratio: AspectRatio::Landscape,
                    }
                );
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(state.is_loading());
        assert!(state.error.is_none());
        assert!(!state.can_generate());
    }

    #[test]
    fn test_only_one_request_in_flight() {
        let mut state = ready_edit_state();
        start(&mut state);
        assert_eq!(state.begin_generation("key"), GenerateOutcome::Busy);
    }

    #[test]
    fn test_success_and_failure_are_exclusive() {
        let mut state = ready_edit_state();
        let id = start(&mut state);
        assert!(state.finish_generation(id, Ok(generated())));
        assert_eq!(state.phase(), Phase::Succeeded);
        assert!(state.error.is_none());

        let id = start(&mut state);
        assert!(state.result.is_none());
        let failure = StylistError::NetworkOrProviderFailure(
            r#"{"error":"{\"message\":\"Deep fail\"}"}"#.to_string(),
        );
        assert!(state.finish_generation(id, Err(failure)));
        assert_eq!(state.phase(), Phase::Failed);
        assert!(state.result.is_none());
        assert_eq!(state.error.as_deref(), Some("Deep fail"));
        assert!(state.can_generate());
    }

    #[test]
    fn test_mode_switch_clears_output_and_discards_stale_result() {
        let mut state = ready_edit_state();
        let id = start(&mut state);

        state.set_mode(AppMode::TryOn);
        assert!(!state.is_loading());
        assert!(!state.finish_generation(id, Ok(generated())));
        assert!(state.result.is_none());
        assert_eq!(state.phase(), Phase::Idle);

        state.error = Some("boom".to_string());
        state.set_mode(AppMode::Edit);
        assert!(state.error.is_none());
        // Images survive a mode round trip.
        assert_eq!(state.phase(), Phase::Ready);
    }

    #[test]
    fn test_output_view_is_mutually_exclusive() {
        let mut state = ready_edit_state();
        assert!(matches!(state.output(), OutputView::Placeholder));

        let id = start(&mut state);
        assert!(matches!(state.output(), OutputView::Loading));

        state.finish_generation(id, Err(StylistError::NoImageInResponse { provider_text: None }));
        assert!(matches!(state.output(), OutputView::Error(_)));

        let id = start(&mut state);
        state.finish_generation(id, Ok(generated()));
        assert!(matches!(state.output(), OutputView::Result(_)));
    }

    #[test]
    fn test_drop_target() {
        let mut state = StudioState::new();
        assert_eq!(state.drop_target(), ImageSlot::EditImage);

        state.set_mode(AppMode::TryOn);
        assert_eq!(state.drop_target(), ImageSlot::Character);

        state.set_image(ImageSlot::Character, Some(upload(b"person")));
        assert_eq!(state.drop_target(), ImageSlot::Clothing);

        state.set_image(ImageSlot::Clothing, Some(upload(b"shirt")));
        assert_eq!(state.drop_target(), ImageSlot::Character);

        state.hovered_slot = Some(ImageSlot::Clothing);
        assert_eq!(state.drop_target(), ImageSlot::Clothing);

        // A hovered slot from the other mode is ignored.
        state.hovered_slot = Some(ImageSlot::EditImage);
        assert_eq!(state.drop_target(), ImageSlot::Character);
    }

    #[test]
    fn test_slider_is_clamped() {
        let mut state = StudioState::new();
        state.set_slider_position(140.0);
        assert_eq!(state.slider_position, 100.0);
        state.set_slider_position(-3.0);
        assert_eq!(state.slider_position, 0.0);
    }

    #[test]
    fn test_prompt_editor_feeds_prompt() {
        let mut state = StudioState::new();
        state.set_image(ImageSlot::EditImage, Some(upload(b"photo")));
        for c in "Add a hat".chars() {
            state.edit_prompt(text_editor::Action::Edit(text_editor::Edit::Insert(c)));
        }
        assert_eq!(state.prompt, "Add a hat");
        assert!(state.can_generate());
    }

    #[test]
    fn test_prompt_is_locked_while_generating() {
        let mut state = StudioState::new();
        state.set_image(ImageSlot::EditImage, Some(upload(b"photo")));
        state.edit_prompt(text_editor::Action::Edit(text_editor::Edit::Insert('x')));
        start(&mut state);

        state.edit_prompt(text_editor::Action::Edit(text_editor::Edit::Insert('y')));
        assert_eq!(state.prompt, "x");
    }
}
