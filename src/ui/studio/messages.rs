use std::path::PathBuf;

use ai_image_stylist::StylistError;
use ai_image_stylist::models::{AppMode, AspectRatio};
use iced::widget::text_editor;

use super::{GeneratedImage, ImageSlot, UploadedImage};

#[derive(Debug, Clone)]
pub enum StudioMessage {
    SelectMode(AppMode),
    PromptEdited(text_editor::Action),
    SelectAspectRatio(AspectRatio),

    // Image ingestion
    PickImage(ImageSlot),
    ImagePicked(ImageSlot, Option<PathBuf>),
    ImageLoaded(ImageSlot, Result<UploadedImage, StylistError>),
    RemoveImage(ImageSlot),
    AlertClosed,

    // Drag and drop
    DropzoneEntered(ImageSlot),
    DropzoneExited(ImageSlot),
    FileHovered,
    FilesHoveredLeft,
    FileDropped(PathBuf),

    // Generation
    Generate,
    GenerationFinished(u64, Result<GeneratedImage, StylistError>),
    SliderMoved(f32),
    Download,
    DownloadFinished(Result<Option<PathBuf>, String>),
}
