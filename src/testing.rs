//! An in-memory board for exercising crawl logic without a browser.
//!
//! [`MockBoard`] serves a listing snapshot and detail pages from memory and
//! grows its visible item count on a scripted schedule each time pagination
//! triggers it.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::extract::{JOB_ITEM, JOB_LINK};
use crate::page::BoardPage;

/// Record of a call made to the mock board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Goto(String),
    LoadMore,
    Scroll,
    Typed { selector: String, text: String },
    IdleWait,
    Screenshot,
}

#[derive(Default)]
struct MockState {
    listing_html: String,
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    search_inputs: HashSet<String>,
    current: Option<String>,
    visible: usize,
    growth: VecDeque<usize>,
    load_more: bool,
    scroll_fails: bool,
    failing_counts: HashSet<usize>,
    count_calls: usize,
    calls: Vec<MockCall>,
}

#[derive(Default)]
pub struct MockBoard {
    state: Mutex<MockState>,
}

impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup returned for any URL without a registered page.
    pub fn with_listing(self, html: impl Into<String>) -> Self {
        self.state().listing_html = html.into();
        self
    }

    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.state().pages.insert(url.into(), html.into());
        self
    }

    /// Navigation to `url` fails.
    pub fn with_failing_page(self, url: impl Into<String>) -> Self {
        self.state().failing.insert(url.into());
        self
    }

    pub fn with_search_input(self, selector: impl Into<String>) -> Self {
        self.state().search_inputs.insert(selector.into());
        self
    }

    /// Starts with `initial` visible items; the n-th pagination trigger adds
    /// `schedule[n]` more, and triggers past the end add nothing.
    pub fn with_items(self, initial: usize, schedule: Vec<usize>) -> Self {
        {
            let mut state = self.state();
            state.visible = initial;
            state.growth = schedule.into();
        }
        self
    }

    /// Whether the board exposes a "load more" button.
    pub fn with_load_more(self, present: bool) -> Self {
        self.state().load_more = present;
        self
    }

    /// Every scroll attempt fails, as when the page context is torn down.
    pub fn with_failing_scroll(self) -> Self {
        self.state().scroll_fails = true;
        self
    }

    /// The `n`-th call to `count` (zero-based) fails.
    pub fn with_failing_count(self, n: usize) -> Self {
        self.state().failing_counts.insert(n);
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    pub fn visited(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::Goto(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn trigger(state: &mut MockState) {
        if let Some(step) = state.growth.pop_front() {
            state.visible += step;
        }
    }
}

#[async_trait]
impl BoardPage for MockBoard {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(MockCall::Goto(url.to_string()));
        if state.failing.contains(url) {
            return Err(AppError::NavigationError(format!("{} returned 503", url)));
        }
        state.current = Some(url.to_string());
        Ok(())
    }

    async fn html(&self) -> Result<String> {
        let state = self.state();
        let page = state.current.as_ref().and_then(|url| state.pages.get(url));
        Ok(page.unwrap_or(&state.listing_html).clone())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let mut state = self.state();
        let call = state.count_calls;
        state.count_calls += 1;
        if state.failing_counts.contains(&call) {
            return Err(AppError::BrowserError(format!("count of {} failed", selector)));
        }
        if state.search_inputs.contains(selector) {
            return Ok(1);
        }
        Ok(match selector {
            JOB_ITEM | JOB_LINK => state.visible,
            _ => 0,
        })
    }

    async fn type_into(&self, selector: &str, text: &str) -> Result<()> {
        let mut state = self.state();
        if !state.search_inputs.contains(selector) {
            return Err(AppError::ParseError(format!("no element matches {}", selector)));
        }
        state.calls.push(MockCall::Typed {
            selector: selector.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn click_load_more(&self) -> Result<bool> {
        let mut state = self.state();
        if !state.load_more {
            return Ok(false);
        }
        state.calls.push(MockCall::LoadMore);
        Self::trigger(&mut state);
        Ok(true)
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        let mut state = self.state();
        state.calls.push(MockCall::Scroll);
        if state.scroll_fails {
            return Err(AppError::BrowserError("Execution context was destroyed".to_string()));
        }
        Self::trigger(&mut state);
        Ok(())
    }

    async fn wait_for_network_idle(&self, _timeout: Duration) -> bool {
        self.state().calls.push(MockCall::IdleWait);
        true
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        self.state().calls.push(MockCall::Screenshot);
        std::fs::write(path, b"")?;
        Ok(())
    }
}
