use std::sync::Arc;

use curtail_service::Links;

#[derive(Clone)]
pub struct AppState {
    links: Arc<dyn Links>,
    base_url: String,
}

impl AppState {
    pub fn new(links: Arc<dyn Links>, public_base_url: impl Into<String>) -> Self {
        Self {
            links,
            base_url: public_base_url.into(),
        }
    }

    pub fn links(&self) -> &dyn Links {
        self.links.as_ref()
    }

    /// Public base URL short links are advertised under.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
