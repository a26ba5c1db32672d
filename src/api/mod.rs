//! Clients for the imgflip HTTP API

pub mod caption;
pub mod download;
pub mod templates;

// Re-exports for public API convenience
pub use caption::{CaptionClient, CaptionText, CaptionedMeme, Credentials};
pub use download::{download_image, fetch_image};
pub use templates::{fetch_templates, pick_random, pick_random_with, Template};

/// User-Agent header sent with every outgoing request.
pub(crate) const USER_AGENT: &str = "MemeMaker/1.0";
