pub mod api;
pub mod app;
pub mod error;
pub mod render;
pub mod store;

// Re-export commonly used items
pub use api::{
    download_image, fetch_image, fetch_templates, pick_random, CaptionClient, CaptionText,
    CaptionedMeme, Credentials, Template,
};
pub use app::MemeLibrary;
pub use error::{MemeError, Result};
pub use render::{wrap_text, CaptionRenderer};
pub use store::{CreatedMeme, FileStorage, MemeStore, StorageBackend};
