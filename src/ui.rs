pub mod api_key_modal;
pub mod application;
pub mod messages;
pub mod result_view;
pub mod studio;

pub use application::ImageStylist;
