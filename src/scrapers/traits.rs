use anyhow::Result;
use async_trait::async_trait;

/// Common trait for everything that can hand back a listing page's HTML.
/// Plain fetches and headless rendering both sit behind it.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page and return its HTML
    async fn fetch(&self, url: &str) -> Result<String>;

    /// Get the name of the page source
    fn source_name(&self) -> &'static str;
}
