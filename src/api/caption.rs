//! Remote captioning client for the imgflip API
//!
//! Submits a template id plus text boxes as a form-encoded POST and returns
//! the rendered image URL.

use crate::error::{MemeError, Result};
use serde::Deserialize;

const API_BASE_URL: &str = "https://api.imgflip.com";

/// imgflip account credentials. Always supplied by the caller, never
/// embedded in the binary.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Caption text input.
///
/// A single string fills the first of two boxes and leaves the second
/// empty; a list maps one entry per text box, in order.
#[derive(Debug, Clone)]
pub enum CaptionText {
    Single(String),
    Boxes(Vec<String>),
}

impl CaptionText {
    /// Normalized `textN` form fields, in box order.
    fn to_fields(&self) -> Vec<(String, String)> {
        match self {
            CaptionText::Single(text) => vec![
                ("text0".to_string(), text.clone()),
                ("text1".to_string(), String::new()),
            ],
            CaptionText::Boxes(texts) => texts
                .iter()
                .enumerate()
                .map(|(i, text)| (format!("text{}", i), text.clone()))
                .collect(),
        }
    }
}

/// A successfully captioned meme
#[derive(Debug, Clone)]
pub struct CaptionedMeme {
    pub image_url: String,
    pub page_url: String,
    pub template_id: String,
}

#[derive(Debug, Deserialize)]
struct CaptionResponse {
    success: bool,
    #[serde(default)]
    data: Option<CaptionData>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionData {
    url: String,
    #[serde(default)]
    page_url: String,
}

/// Client for the imgflip caption endpoint
pub struct CaptionClient {
    client: reqwest::Client,
    credentials: Credentials,
    pub(crate) base_url: String,
}

impl CaptionClient {
    /// Creates a new caption client with the given credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            base_url: API_BASE_URL.to_string(),
        }
    }

    /// Caption a template and return the rendered image URLs.
    pub async fn caption(&self, template_id: &str, texts: &CaptionText) -> Result<CaptionedMeme> {
        let url = format!("{}/caption_image", self.base_url);

        let mut params: Vec<(String, String)> = vec![
            ("template_id".to_string(), template_id.to_string()),
            ("username".to_string(), self.credentials.username.clone()),
            ("password".to_string(), self.credentials.password.clone()),
        ];
        params.extend(texts.to_fields());

        log::info!("Captioning template: {}", template_id);

        let response = self
            .client
            .post(&url)
            .header("User-Agent", crate::api::USER_AGENT)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MemeError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        log::debug!("Caption response: {}", body);

        let payload: CaptionResponse = serde_json::from_str(&body)?;
        if !payload.success {
            let message = payload
                .error_message
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(MemeError::Api(message));
        }

        let data = payload
            .data
            .ok_or_else(|| MemeError::Api("caption response missing data".to_string()))?;

        Ok(CaptionedMeme {
            image_url: data.url,
            page_url: data.page_url,
            template_id: template_id.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "caption_tests.rs"]
mod tests;
