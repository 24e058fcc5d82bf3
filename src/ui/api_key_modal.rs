use iced::alignment::Horizontal;
use iced::widget::{button, center, column, container, mouse_area, opaque, row, stack, text, text_input};
use iced::{Element, Length};

use crate::ui::messages::Message;

/// Draft state of the API key dialog. The stored key only changes on Save.
#[derive(Debug, Default)]
pub struct ApiKeyDialog {
    pub is_open: bool,
    pub draft: String,
}

impl ApiKeyDialog {
    /// Opens the dialog with the draft reset to `current`.
    pub fn open(&mut self, current: &str) {
        self.draft = current.to_string();
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.draft.clear();
    }
}

/// Draws the dialog over `base` when open.
pub fn view<'a>(base: Element<'a, Message>, dialog: &'a ApiKeyDialog) -> Element<'a, Message> {
    if !dialog.is_open {
        return base;
    }

    let content = column![
        text("Your Gemini API Key").size(22),
        text(
            "Your key is stored locally on this computer and is only ever sent to the Gemini API."
        )
        .size(14)
        .color(crate::style::MUTED),
        text_input("Enter your Gemini API Key", &dialog.draft)
            .secure(true)
            .on_input(Message::ApiKeyDraftChanged)
            .on_submit(Message::SaveApiKey)
            .padding(12)
            .style(crate::style::default_text_input),
        container(
            row![
                button(text("Cancel"))
                    .on_press(Message::CloseApiKeyDialog)
                    .padding([8, 16])
                    .style(button::secondary),
                button(text("Save"))
                    .on_press(Message::SaveApiKey)
                    .padding([8, 16])
                    .style(button::primary),
            ]
            .spacing(16)
        )
        .width(Length::Fill)
        .align_x(Horizontal::Right),
    ]
    .spacing(16);

    let panel = container(content)
        .max_width(448)
        .padding(24)
        .style(crate::style::dialog_box);

    // Clicks on the panel are swallowed; clicks on the backdrop close it.
    stack![
        base,
        opaque(
            mouse_area(center(opaque(panel)).style(crate::style::backdrop))
                .on_press(Message::CloseApiKeyDialog)
        )
    ]
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_resets_draft_to_stored_key() {
        let mut dialog = ApiKeyDialog::default();
        dialog.open("stored");
        dialog.draft = "half-typed".to_string();
        dialog.close();
        assert!(!dialog.is_open);

        dialog.open("stored");
        assert!(dialog.is_open);
        assert_eq!(dialog.draft, "stored");
    }
}
