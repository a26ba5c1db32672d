//! Template catalog client for the imgflip API
//!
//! Uses async reqwest for non-blocking HTTP requests.

use crate::error::{MemeError, Result};
use rand::Rng;
use serde::Deserialize;

const TEMPLATES_URL: &str = "https://api.imgflip.com/get_memes";

/// A captionable meme template from the remote catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub url: String,
    /// Number of text boxes; never zero after normalization
    pub box_count: u32,
}

#[derive(Debug, Deserialize)]
struct TemplatesResponse {
    success: bool,
    #[serde(default)]
    data: Option<TemplatesData>,
}

#[derive(Debug, Deserialize)]
struct TemplatesData {
    memes: Vec<RawTemplate>,
}

#[derive(Debug, Deserialize)]
struct RawTemplate {
    id: String,
    name: String,
    url: String,
    #[serde(default)]
    box_count: u32,
}

impl RawTemplate {
    /// A missing or zero box count becomes the two-box default.
    fn normalize(self) -> Template {
        Template {
            id: self.id,
            name: self.name,
            url: self.url,
            box_count: if self.box_count == 0 { 2 } else { self.box_count },
        }
    }
}

/// Fetch the meme template catalog from imgflip
pub async fn fetch_templates() -> Result<Vec<Template>> {
    fetch_templates_from(TEMPLATES_URL).await
}

/// Fetches the catalog from the given URL (for testing with mock servers).
pub(crate) async fn fetch_templates_from(url: &str) -> Result<Vec<Template>> {
    log::info!("Fetching meme templates from: {}", url);

    let response = reqwest::Client::new()
        .get(url)
        .header("User-Agent", crate::api::USER_AGENT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(MemeError::HttpStatus(response.status()));
    }

    let payload: TemplatesResponse = response.json().await?;
    if !payload.success {
        return Err(MemeError::Api(
            "template catalog reported failure".to_string(),
        ));
    }

    let templates: Vec<Template> = payload
        .data
        .map(|d| d.memes.into_iter().map(RawTemplate::normalize).collect())
        .unwrap_or_default();

    log::info!("Fetched {} templates", templates.len());
    Ok(templates)
}

/// Pick a uniformly random template from the slice.
///
/// Returns `None` for an empty slice.
pub fn pick_random(templates: &[Template]) -> Option<&Template> {
    pick_random_with(templates, &mut rand::thread_rng())
}

/// Like [`pick_random`] but with a caller-supplied randomness source,
/// so selection is reproducible under test.
pub fn pick_random_with<'a, R: Rng>(
    templates: &'a [Template],
    rng: &mut R,
) -> Option<&'a Template> {
    if templates.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..templates.len());
    templates.get(index)
}

#[cfg(test)]
#[path = "templates_tests.rs"]
mod tests;
