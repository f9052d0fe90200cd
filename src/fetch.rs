//! HTTP-only page backend for boards that render server-side, and the fallback
//! when the crate is built without the `browser` feature.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::page::BoardPage;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// Create a static client to reuse connections
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(USER_AGENT)
        .pool_max_idle_per_host(4)
        .build()
        .expect("Failed to build HTTP client")
});

pub async fn fetch_html(url: &str) -> Result<String> {
    let response = CLIENT.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::NavigationError(format!("{} returned {}", url, status)));
    }
    Ok(response.text().await?)
}

/// A page whose document is whatever the server sent. It cannot click, scroll
/// or type, so pagination converges immediately and filters are skipped.
#[derive(Default)]
pub struct StaticPage {
    document: Mutex<String>,
}

impl StaticPage {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> String {
        self.document.lock().map(|doc| doc.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl BoardPage for StaticPage {
    async fn goto(&self, url: &str) -> Result<()> {
        let html = fetch_html(url).await?;
        if let Ok(mut document) = self.document.lock() {
            *document = html;
        }
        Ok(())
    }

    async fn html(&self) -> Result<String> {
        Ok(self.snapshot())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let selector = Selector::parse(selector)
            .map_err(|e| AppError::ParseError(format!("invalid selector {}: {:?}", selector, e)))?;
        let document = Html::parse_document(&self.snapshot());
        Ok(document.select(&selector).count())
    }

    async fn type_into(&self, selector: &str, _text: &str) -> Result<()> {
        Err(AppError::BrowserError(format!(
            "cannot type into {} without a browser",
            selector
        )))
    }

    async fn click_load_more(&self) -> Result<bool> {
        Ok(false)
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        Ok(())
    }

    async fn wait_for_network_idle(&self, _timeout: Duration) -> bool {
        true
    }

    async fn screenshot(&self, _path: &Path) -> Result<()> {
        Err(AppError::BrowserError(
            "screenshots need the browser backend".to_string(),
        ))
    }
}
