//! The seam between crawl logic and whatever renders the board.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// One open page. Every call is awaited before the next is issued; nothing in
/// the crate drives a page concurrently.
#[async_trait]
pub trait BoardPage: Send + Sync {
    /// Navigates to `url`, failing on transport errors, timeouts and
    /// non-success responses.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Serialized markup of the current document.
    async fn html(&self) -> Result<String>;

    /// Number of elements matching a CSS selector.
    async fn count(&self, selector: &str) -> Result<usize>;

    async fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.count(selector).await? > 0)
    }

    /// Focuses the first element matching `selector` and types `text` into it.
    async fn type_into(&self, selector: &str, text: &str) -> Result<()>;

    /// Clicks a visible "load more"-type control. `Ok(false)` when the page
    /// has none.
    async fn click_load_more(&self) -> Result<bool>;

    async fn scroll_to_bottom(&self) -> Result<()>;

    /// Best-effort wait for network quiet. Returns whether idle was observed
    /// before `timeout`; never an error.
    async fn wait_for_network_idle(&self, timeout: Duration) -> bool;

    /// Writes a full-page screenshot. Backends without rendering return an error.
    async fn screenshot(&self, path: &Path) -> Result<()>;
}
