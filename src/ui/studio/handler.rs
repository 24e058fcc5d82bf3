use std::path::PathBuf;
use std::sync::Arc;

use ai_image_stylist::StylistError;
use ai_image_stylist::models::GenerationRequest;
use ai_image_stylist::utils::ingestion::{self, PICKER_EXTENSIONS};
use ai_image_stylist::utils::{CredentialStore, GeminiClient};
use iced::Task;
use tracing::{debug, error, info, warn};

use super::{GenerateOutcome, GeneratedImage, ImageSlot, StudioMessage, StudioState, UploadedImage};
use crate::ui::messages::Message;

pub const DOWNLOAD_FILE_NAME: &str = "ai-styled-image.png";

pub fn handle_message(
    state: &mut StudioState,
    credentials: &CredentialStore,
    client: &Arc<GeminiClient>,
    message: StudioMessage,
) -> Task<Message> {
    match message {
        StudioMessage::SelectMode(mode) => {
            state.set_mode(mode);
            Task::none()
        }

        StudioMessage::PromptEdited(action) => {
            state.edit_prompt(action);
            Task::none()
        }

        StudioMessage::SelectAspectRatio(ratio) => {
            if !state.is_loading() {
                state.aspect_ratio = ratio;
            }
            Task::none()
        }

        StudioMessage::PickImage(slot) => Task::perform(pick_image_file(slot), move |path| {
            Message::Studio(StudioMessage::ImagePicked(slot, path))
        }),

        StudioMessage::ImagePicked(slot, Some(path)) => load_image(slot, path),

        StudioMessage::ImagePicked(_, None) => {
            debug!("Image selection cancelled");
            Task::none()
        }

        StudioMessage::ImageLoaded(slot, Ok(image)) => {
            info!("Image ready for {:?}: {:?}", slot, image.record);
            state.set_image(slot, Some(image));
            Task::none()
        }

        StudioMessage::ImageLoaded(slot, Err(e)) => {
            // Rejected files never reach the state; the user just gets told.
            warn!("Error processing file for {:?}: {}", slot, e);
            Task::perform(
                show_alert("Invalid file", "Please upload a valid image file.".to_string()),
                |_| Message::Studio(StudioMessage::AlertClosed),
            )
        }

        StudioMessage::RemoveImage(slot) => {
            debug!("Removing image from {:?}", slot);
            state.set_image(slot, None);
            Task::none()
        }

        StudioMessage::AlertClosed => Task::none(),

        StudioMessage::DropzoneEntered(slot) => {
            if slot.mode() == state.mode {
                state.hovered_slot = Some(slot);
            }
            Task::none()
        }

        StudioMessage::DropzoneExited(slot) => {
            if state.hovered_slot == Some(slot) {
                state.hovered_slot = None;
            }
            Task::none()
        }

        StudioMessage::FileHovered => {
            state.dragging = true;
            Task::none()
        }

        StudioMessage::FilesHoveredLeft => {
            state.dragging = false;
            Task::none()
        }

        StudioMessage::FileDropped(path) => {
            state.dragging = false;
            let slot = state.drop_target();
            debug!("File dropped onto {:?}: {}", slot, path.display());
            load_image(slot, path)
        }

        StudioMessage::Generate => match state.begin_generation(credentials.get()) {
            GenerateOutcome::Started { id, request } => {
                info!("Starting generation #{} ({})", id, request.mode());
                let (task, handle) =
                    generation_task(Arc::clone(client), credentials.get().to_string(), id, request)
                        .abortable();
                state.track_task(id, handle);
                task
            }
            GenerateOutcome::MissingCredential => {
                warn!("Generation requested without an API key");
                Task::none()
            }
            GenerateOutcome::NotReady => {
                warn!("Generation requested with incomplete inputs");
                Task::none()
            }
            GenerateOutcome::Busy => {
                debug!("Generation already in flight, ignoring");
                Task::none()
            }
        },

        StudioMessage::GenerationFinished(id, outcome) => {
            state.finish_generation(id, outcome);
            Task::none()
        }

        StudioMessage::SliderMoved(position) => {
            state.set_slider_position(position);
            Task::none()
        }

        StudioMessage::Download => match &state.result {
            Some(generated) => Task::perform(save_png(Arc::clone(&generated.png)), |result| {
                Message::Studio(StudioMessage::DownloadFinished(result))
            }),
            None => Task::none(),
        },

        StudioMessage::DownloadFinished(Ok(Some(path))) => {
            info!("Saved generated image to {}", path.display());
            Task::none()
        }

        StudioMessage::DownloadFinished(Ok(None)) => {
            debug!("Download cancelled");
            Task::none()
        }

        StudioMessage::DownloadFinished(Err(e)) => {
            error!("{}", e);
            Task::perform(show_alert("Download failed", e), |_| {
                Message::Studio(StudioMessage::AlertClosed)
            })
        }
    }
}

fn load_image(slot: ImageSlot, path: PathBuf) -> Task<Message> {
    Task::perform(
        async move {
            ingestion::ingest_path(&path)
                .await
                .map(|ingested| UploadedImage::new(ingested.record, ingested.bytes))
        },
        move |result| Message::Studio(StudioMessage::ImageLoaded(slot, result)),
    )
}

fn generation_task(
    client: Arc<GeminiClient>,
    api_key: String,
    id: u64,
    request: GenerationRequest,
) -> Task<Message> {
    Task::perform(
        async move {
            let result = client.generate(&request, &api_key).await?;
            let original = request.original().clone();
            tokio::task::spawn_blocking(move || GeneratedImage::prepare(result, &original))
                .await
                .map_err(|e| {
                    StylistError::NetworkOrProviderFailure(format!(
                        "Failed to process generated image: {}",
                        e
                    ))
                })?
        },
        move |result| Message::Studio(StudioMessage::GenerationFinished(id, result)),
    )
}

async fn pick_image_file(slot: ImageSlot) -> Option<PathBuf> {
    rfd::AsyncFileDialog::new()
        .set_title(slot.title())
        .add_filter("Images", PICKER_EXTENSIONS)
        .pick_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}

async fn save_png(png: Arc<Vec<u8>>) -> Result<Option<PathBuf>, String> {
    let Some(handle) = rfd::AsyncFileDialog::new()
        .set_title("Save generated image")
        .set_file_name(DOWNLOAD_FILE_NAME)
        .add_filter("PNG image", &["png"])
        .save_file()
        .await
    else {
        return Ok(None);
    };

    let path = handle.path().to_path_buf();
    tokio::fs::write(&path, png.as_slice())
        .await
        .map_err(|e| format!("Failed to save {}: {}", path.display(), e))?;
    Ok(Some(path))
}

async fn show_alert(title: &'static str, description: String) {
    rfd::AsyncMessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(rfd::MessageButtons::Ok)
        .show()
        .await;
}
