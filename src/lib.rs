// Public library interface for ai-image-stylist
//
// Everything that does not need a window lives here: the data model, the
// provider client, local storage and the image helpers. The desktop binary
// in main.rs layers the iced UI on top.

pub mod error;
pub mod models;
pub mod utils;

pub use error::StylistError;
