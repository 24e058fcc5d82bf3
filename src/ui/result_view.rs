use iced::alignment::{Horizontal, Vertical};
use iced::widget::{button, column, container, image, row, slider, stack, text};
use iced::{Alignment, ContentFit, Element, Length};

use crate::ui::studio::{GeneratedImage, OutputView, StudioMessage, StudioState};

/// Right-hand output panel.
pub fn view(state: &StudioState) -> Element<'_, StudioMessage> {
    let body: Element<'_, StudioMessage> = match state.output() {
        OutputView::Loading => view_notice(
            text("Generating your image...").size(20),
            text("This might take a moment.").size(14).color(crate::style::MUTED),
        ),
        OutputView::Error(message) => view_notice(
            text("An Error Occurred").size(20).color(crate::style::ERROR),
            text(message).size(14).align_x(Horizontal::Center),
        ),
        OutputView::Placeholder => view_notice(
            text("Your generated image will appear here").size(20),
            text("Upload your images and press Generate.")
                .size(14)
                .color(crate::style::MUTED),
        ),
        OutputView::Result(generated) => view_result(state, generated),
    };

    container(body)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(16)
        .style(crate::style::bordered_box)
        .into()
}

fn view_notice<'a>(
    title: iced::widget::Text<'a>,
    detail: iced::widget::Text<'a>,
) -> Element<'a, StudioMessage> {
    container(column![title, detail].spacing(8).align_x(Alignment::Center))
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

fn view_result<'a>(
    state: &'a StudioState,
    generated: &'a GeneratedImage,
) -> Element<'a, StudioMessage> {
    let picture: Element<'a, StudioMessage> = match &state.comparison_frame {
        Some(frame) => {
            let labels = container(
                row![
                    container(image_label("Original")).width(Length::Fill),
                    image_label("Generated"),
                ]
                .padding(8),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .align_y(Vertical::Bottom);

            column![
                stack![
                    image(frame.clone())
                        .content_fit(ContentFit::Contain)
                        .width(Length::Fill)
                        .height(Length::Fill),
                    labels,
                ],
                slider(0.0..=100.0, state.slider_position, StudioMessage::SliderMoved).step(0.5),
            ]
            .spacing(12)
            .into()
        }
        None => image(generated.handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
    };

    let download = container(
        button(text("Download"))
            .on_press(StudioMessage::Download)
            .padding([8, 16])
            .style(button::primary),
    )
    .width(Length::Fill)
    .align_x(Horizontal::Right);

    column![picture, download].spacing(12).into()
}

fn image_label(label: &str) -> Element<'_, StudioMessage> {
    container(text(label).size(12))
        .padding([4, 8])
        .style(crate::style::image_label)
        .into()
}
