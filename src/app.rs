//! Template selection state: the loaded catalog and the current pick

use crate::api::templates::{fetch_templates, fetch_templates_from, pick_random};
use crate::api::Template;
use crate::error::Result;

/// Holds the fetched template catalog and the currently selected template.
///
/// Starts empty; [`load`](MemeLibrary::load) fills the catalog and picks a
/// first random template. A failed load is logged and leaves prior state
/// untouched, so callers never observe a partial update.
#[derive(Debug, Default)]
pub struct MemeLibrary {
    templates: Vec<Template>,
    current: Option<Template>,
}

impl MemeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the catalog and immediately select a random current template.
    pub async fn load(&mut self) {
        self.apply(fetch_templates().await);
    }

    /// Like [`load`](MemeLibrary::load) but against the given catalog URL
    /// (for testing with mock servers).
    pub(crate) async fn load_from(&mut self, url: &str) {
        self.apply(fetch_templates_from(url).await);
    }

    fn apply(&mut self, fetched: Result<Vec<Template>>) {
        match fetched {
            Ok(templates) => {
                self.templates = templates;
                self.select_random();
            }
            Err(e) => log::error!("Failed to load meme templates: {}", e),
        }
    }

    /// Re-derive the current selection from the loaded templates. Never
    /// mutates the catalog itself.
    pub fn select_random(&mut self) {
        self.current = pick_random(&self.templates).cloned();
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn current(&self) -> Option<&Template> {
        self.current.as_ref()
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
