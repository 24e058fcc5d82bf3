use crate::ui::studio::StudioMessage;

#[derive(Debug, Clone)]
pub enum Message {
    // API key dialog
    OpenApiKeyDialog,
    CloseApiKeyDialog,
    ApiKeyDraftChanged(String),
    SaveApiKey,

    Studio(StudioMessage),
}
