//! Downloading rendered meme images to local files

use crate::error::{MemeError, Result};
use std::path::Path;

/// Filename used when the caller does not supply one.
pub const DEFAULT_FILENAME: &str = "meme.jpg";

/// Fetch image bytes from a URL
pub async fn fetch_image(url: &str) -> Result<Vec<u8>> {
    log::debug!("Fetching image: {}", url);

    let response = reqwest::Client::new()
        .get(url)
        .header("User-Agent", crate::api::USER_AGENT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(MemeError::HttpStatus(response.status()));
    }

    Ok(response.bytes().await?.to_vec())
}

/// Fetch an image and write it to `path`.
pub async fn download_image(url: &str, path: &Path) -> Result<()> {
    let bytes = fetch_image(url).await?;
    std::fs::write(path, &bytes)?;
    log::info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
