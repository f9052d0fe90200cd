//! Headless Chromium backend over the DevTools protocol.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::ScreenshotParams;
use futures::StreamExt;
use log::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::page::BoardPage;

const LOAD_MORE_SCRIPT: &str = r#"(() => {
    const labels = ["load more", "show more", "more jobs", "view more", "see more"];
    const candidates = Array.from(document.querySelectorAll(
        'button, a, [role="button"], [data-testid*="load-more"]'));
    const target = candidates.find(el => {
        const text = (el.innerText || el.textContent || "").trim().toLowerCase();
        const rect = el.getBoundingClientRect();
        const labelled = labels.some(l => text.startsWith(l))
            || (el.getAttribute("data-testid") || "").includes("load-more");
        return labelled && !el.disabled && rect.width > 0 && rect.height > 0;
    });
    if (!target) return false;
    target.scrollIntoView({ block: "center" });
    target.click();
    return true;
})()"#;

const SCROLL_SCRIPT: &str = r#"(() => {
    window.scrollTo(0, document.body.scrollHeight);
    return true;
})()"#;

const NAVIGATION_STATUS_SCRIPT: &str = r#"(() => {
    const nav = performance.getEntriesByType("navigation")[0];
    return nav && nav.responseStatus ? nav.responseStatus : 0;
})()"#;

/// Resolves once the resource-timing buffer has been quiet for a second, or
/// with `false` when `timeoutMs` passes first.
fn network_idle_script(timeout: Duration) -> String {
    format!(
        r#"(async () => {{
    const timeoutMs = {timeout_ms};
    const idleMs = 1000;
    const interval = 250;
    const start = Date.now();
    let last = performance.getEntriesByType("resource").length;
    let stable = 0;
    while (Date.now() - start < timeoutMs) {{
        await new Promise(r => setTimeout(r, interval));
        const now = performance.getEntriesByType("resource").length;
        if (document.readyState === "complete" && now === last) {{
            stable += interval;
            if (stable >= idleMs) return true;
        }} else {{
            stable = 0;
        }}
        last = now;
    }}
    return false;
}})()"#,
        timeout_ms = timeout.as_millis()
    )
}

#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headed: bool,
    pub chrome_path: Option<PathBuf>,
    pub nav_timeout: Duration,
}

/// A launched browser with one open page. Call [`BrowserSession::close`] on
/// every exit path; dropping the session only stops the event handler.
pub struct BrowserSession {
    browser: Browser,
    page: ChromePage,
    handler_task: tokio::task::JoinHandle<()>,
}

impl BrowserSession {
    pub async fn launch(options: &BrowserOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .request_timeout(options.nav_timeout)
            .window_size(1440, 900)
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage");
        if options.headed {
            builder = builder.with_head();
        }
        if let Some(path) = &options.chrome_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(AppError::BrowserError)?;

        info!("Launching {} browser", if options.headed { "headed" } else { "headless" });
        let (browser, mut handler) = Browser::launch(config).await?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler event error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(e.into());
            }
        };

        Ok(Self {
            browser,
            page: ChromePage {
                page,
                nav_timeout: options.nav_timeout,
            },
            handler_task,
        })
    }

    pub fn page(&self) -> &ChromePage {
        &self.page
    }

    pub async fn close(mut self) -> Result<()> {
        info!("Closing browser");
        if let Err(e) = self.browser.close().await {
            warn!("Browser did not close cleanly: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed waiting for browser exit: {}", e);
        }
        self.handler_task.abort();
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

pub struct ChromePage {
    page: Page,
    nav_timeout: Duration,
}

impl ChromePage {
    async fn eval<T: serde::de::DeserializeOwned>(&self, script: &str) -> Result<T> {
        let result = self.page.evaluate(script).await?;
        Ok(result.into_value::<T>()?)
    }
}

#[async_trait]
impl BoardPage for ChromePage {
    async fn goto(&self, url: &str) -> Result<()> {
        match tokio::time::timeout(self.nav_timeout, self.page.goto(url)).await {
            Err(_) => {
                return Err(AppError::NavigationError(format!(
                    "{} timed out after {:?}",
                    url, self.nav_timeout
                )));
            }
            Ok(Err(e)) => return Err(AppError::NavigationError(format!("{}: {}", url, e))),
            Ok(Ok(_)) => {}
        }

        let status: u16 = self.eval(NAVIGATION_STATUS_SCRIPT).await.unwrap_or(0);
        if status >= 400 {
            return Err(AppError::NavigationError(format!("{} returned {}", url, status)));
        }
        Ok(())
    }

    async fn html(&self) -> Result<String> {
        if let Ok(html) = self.eval::<String>("document.documentElement.outerHTML").await {
            if !html.is_empty() {
                return Ok(html);
            }
        }
        Ok(self.page.content().await?)
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let script = format!(
            "document.querySelectorAll({}).length",
            serde_json::to_string(selector)?
        );
        self.eval(&script).await
    }

    async fn type_into(&self, selector: &str, text: &str) -> Result<()> {
        let input = self.page.find_element(selector).await?;
        input.click().await?;
        input.type_str(text).await?;
        Ok(())
    }

    async fn click_load_more(&self) -> Result<bool> {
        self.eval(LOAD_MORE_SCRIPT).await
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        let _: bool = self.eval(SCROLL_SCRIPT).await?;
        Ok(())
    }

    async fn wait_for_network_idle(&self, timeout: Duration) -> bool {
        let script = network_idle_script(timeout);
        let grace = timeout + Duration::from_secs(1);
        match tokio::time::timeout(grace, self.eval::<bool>(&script)).await {
            Ok(Ok(idle)) => idle,
            Ok(Err(e)) => {
                debug!("Network-idle probe failed: {}", e);
                false
            }
            Err(_) => false,
        }
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        let params = ScreenshotParams::builder().full_page(true).build();
        self.page.save_screenshot(params, path).await?;
        Ok(())
    }
}
