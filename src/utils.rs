pub mod comparison;
pub mod credential_store;
pub mod error_normalizer;
pub mod gemini;
pub mod ingestion;
pub mod settings;
pub mod storage;

pub use credential_store::CredentialStore;
pub use error_normalizer::normalize_error_message;
pub use gemini::GeminiClient;
pub use settings::Settings;
