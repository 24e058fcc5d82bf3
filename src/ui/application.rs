use std::sync::Arc;

use ai_image_stylist::utils::settings::{self, Settings};
use ai_image_stylist::utils::storage::{KeyValueStore, MemoryStore, TomlFileStore};
use ai_image_stylist::utils::{CredentialStore, GeminiClient};
use iced::alignment::Horizontal;
use iced::widget::{button, column, container, row, scrollable, text};
use iced::{Element, Event, Length, Subscription, Task, event, window};
use tracing::{debug, error, info};

use crate::ui::api_key_modal::{self, ApiKeyDialog};
use crate::ui::messages::Message;
use crate::ui::result_view;
use crate::ui::studio::{self, StudioMessage, StudioState};

pub struct ImageStylist {
    pub studio: StudioState,
    pub credentials: CredentialStore,
    pub api_key_dialog: ApiKeyDialog,
    client: Arc<GeminiClient>,
}

impl ImageStylist {
    pub fn new() -> Self {
        let settings = Settings::load();
        info!(
            "Using model {} at {}",
            settings.model, settings.api_base_url
        );

        let backend: Box<dyn KeyValueStore> = match settings::storage_dir() {
            Ok(dir) => Box::new(TomlFileStore::in_dir(&dir)),
            Err(e) => {
                error!("{:#}, the API key will not be saved between sessions", e);
                Box::new(MemoryStore::default())
            }
        };

        let mut credentials = CredentialStore::open(backend);
        credentials.subscribe(|key: &str| debug!("API key configured: {}", !key.is_empty()));
        info!("API key configured at startup: {}", credentials.is_configured());

        Self::with_credentials(credentials, &settings)
    }

    fn with_credentials(credentials: CredentialStore, settings: &Settings) -> Self {
        Self {
            studio: StudioState::new(),
            credentials,
            api_key_dialog: ApiKeyDialog::default(),
            client: Arc::new(GeminiClient::new(settings)),
        }
    }

    pub fn title(&self) -> String {
        format!("AI Image Stylist v{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenApiKeyDialog => {
                self.api_key_dialog.open(self.credentials.get());
                Task::none()
            }

            Message::CloseApiKeyDialog => {
                self.api_key_dialog.close();
                Task::none()
            }

            Message::ApiKeyDraftChanged(draft) => {
                self.api_key_dialog.draft = draft;
                Task::none()
            }

            Message::SaveApiKey => {
                self.credentials.set(&self.api_key_dialog.draft);
                self.api_key_dialog.close();
                Task::none()
            }

            Message::Studio(msg) => {
                let task =
                    studio::handle_message(&mut self.studio, &self.credentials, &self.client, msg);
                if self.studio.take_credential_request() {
                    self.api_key_dialog.open(self.credentials.get());
                }
                task
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let key_label = if self.credentials.is_configured() {
            "Change API Key"
        } else {
            "Add API Key"
        };
        let top_bar = container(
            button(text(key_label).size(14))
                .on_press(Message::OpenApiKeyDialog)
                .padding([8, 16])
                .style(button::secondary),
        )
        .width(Length::Fill)
        .align_x(Horizontal::Right);

        let controls = scrollable(
            container(studio::ui::view_controls(&self.studio).map(Message::Studio))
                .padding([0, 12]),
        )
        .width(Length::FillPortion(1))
        .height(Length::Fill);

        let output = container(result_view::view(&self.studio).map(Message::Studio))
            .width(Length::FillPortion(1))
            .height(Length::Fill);

        let content = column![top_bar, row![controls, output].spacing(24)]
            .spacing(16)
            .padding(24);

        let base = container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(crate::style::main_box)
            .into();

        api_key_modal::view(base, &self.api_key_dialog)
    }

    /// Forwards OS drag-and-drop events to the studio.
    pub fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileHovered(_)) => {
                Some(Message::Studio(StudioMessage::FileHovered))
            }
            Event::Window(window::Event::FilesHoveredLeft) => {
                Some(Message::Studio(StudioMessage::FilesHoveredLeft))
            }
            Event::Window(window::Event::FileDropped(path)) => {
                Some(Message::Studio(StudioMessage::FileDropped(path)))
            }
            _ => None,
        })
    }
}

impl Default for ImageStylist {
    fn default() -> Self {
        Self::new()
    }
}
