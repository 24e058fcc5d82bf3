use ai_image_stylist::models::{AppMode, AspectRatio};
use iced::alignment::{Horizontal, Vertical};
use iced::widget::{
    button, column, container, image, mouse_area, row, stack, text, text_editor,
};
use iced::{Alignment, ContentFit, Element, Length};

use super::{ImageSlot, StudioMessage, StudioState, UploadedImage};

const DROPZONE_HEIGHT: f32 = 192.0;

/// Left-hand column: header, mode switch, inputs and the Generate button.
pub fn view_controls(state: &StudioState) -> Element<'_, StudioMessage> {
    let header = column![
        text("AI Image Stylist")
            .size(40)
            .color(crate::style::ACCENT)
            .width(Length::Fill)
            .align_x(Horizontal::Center),
        text("Edit images with prompts or virtually try on clothes using Gemini.")
            .size(16)
            .color(crate::style::MUTED)
            .width(Length::Fill)
            .align_x(Horizontal::Center),
    ]
    .spacing(10);

    let inputs: Element<'_, StudioMessage> = match state.mode {
        AppMode::Edit => column![
            view_dropzone(ImageSlot::EditImage, state),
            text_editor(&state.prompt_editor)
                .placeholder(
                    "Describe your edit, e.g., 'Add a retro filter' or 'Make the sky purple'..."
                )
                .on_action(StudioMessage::PromptEdited)
                .height(96)
                .padding(12),
            view_aspect_ratio_selector(state.aspect_ratio, state.is_loading()),
        ]
        .spacing(16)
        .into(),
        AppMode::TryOn => column![
            view_dropzone(ImageSlot::Character, state),
            view_dropzone(ImageSlot::Clothing, state),
        ]
        .spacing(16)
        .into(),
    };

    let panel = container(inputs)
        .padding(16)
        .width(Length::Fill)
        .style(crate::style::bordered_box);

    let generate_label = if state.is_loading() {
        "Generating..."
    } else {
        "Generate Image"
    };
    let generate_button = button(
        container(text(generate_label).size(18)).center_x(Length::Fill),
    )
    .on_press_maybe(state.can_generate().then_some(StudioMessage::Generate))
    .width(Length::Fill)
    .padding(16)
    .style(button::primary);

    column![header, view_mode_selector(state.mode), panel, generate_button]
        .spacing(24)
        .width(Length::Fill)
        .into()
}

fn view_mode_selector(current: AppMode) -> Element<'static, StudioMessage> {
    let segment = |mode: AppMode| {
        button(container(text(mode.to_string()).size(14)).center_x(Length::Fill))
            .on_press(StudioMessage::SelectMode(mode))
            .width(Length::Fill)
            .padding(12)
            .style(crate::style::segment(mode == current))
    };

    container(row![segment(AppMode::Edit), segment(AppMode::TryOn)].spacing(16))
        .padding(8)
        .style(crate::style::bordered_box)
        .into()
}

fn view_aspect_ratio_selector(
    selected: AspectRatio,
    disabled: bool,
) -> Element<'static, StudioMessage> {
    let options = AspectRatio::ALL.iter().map(|ratio| {
        Element::from(
            button(container(text(ratio.label()).size(14)).center_x(Length::Fill))
                .on_press_maybe((!disabled).then_some(StudioMessage::SelectAspectRatio(*ratio)))
                .width(Length::Fill)
                .padding(8)
                .style(crate::style::segment(*ratio == selected)),
        )
    });

    column![
        text("Aspect Ratio").size(14).color(crate::style::MUTED),
        row(options).spacing(8),
    ]
    .spacing(8)
    .into()
}

/// Upload area for one slot: an invitation to pick or drop a file when
/// empty, a preview with a remove control otherwise.
fn view_dropzone(slot: ImageSlot, state: &StudioState) -> Element<'_, StudioMessage> {
    match state.image(slot) {
        Some(uploaded) => view_preview(slot, uploaded),
        None => {
            let content = column![
                text(slot.title()).size(14),
                text("Click to upload or drag and drop").size(12),
            ]
            .spacing(8)
            .align_x(Alignment::Center);

            let zone = container(content)
                .width(Length::Fill)
                .height(DROPZONE_HEIGHT)
                .center_x(Length::Fill)
                .center_y(DROPZONE_HEIGHT)
                .style(crate::style::dropzone(state.dragging));

            mouse_area(zone)
                .on_press(StudioMessage::PickImage(slot))
                .on_enter(StudioMessage::DropzoneEntered(slot))
                .on_exit(StudioMessage::DropzoneExited(slot))
                .into()
        }
    }
}

fn view_preview(slot: ImageSlot, uploaded: &UploadedImage) -> Element<'_, StudioMessage> {
    let preview = image(uploaded.preview.clone())
        .content_fit(ContentFit::Cover)
        .width(Length::Fill)
        .height(DROPZONE_HEIGHT);

    let remove = container(
        button(text("Remove").size(12))
            .on_press(StudioMessage::RemoveImage(slot))
            .padding([4, 10])
            .style(button::secondary),
    )
    .padding(8)
    .width(Length::Fill)
    .align_x(Horizontal::Right)
    .align_y(Vertical::Top);

    // Dropping onto a filled slot replaces its image.
    mouse_area(stack![preview, remove])
        .on_enter(StudioMessage::DropzoneEntered(slot))
        .on_exit(StudioMessage::DropzoneExited(slot))
        .into()
}
