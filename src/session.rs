//! Positions a page on a board's listing route with hydration complete and the
//! optional search filter applied.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use url::Url;

use crate::error::Result;
use crate::extract::{GROUPED_CONTAINER, JOB_ITEM, JOB_LINK};
use crate::page::BoardPage;

/// Search boxes differ per board; the first selector that matches wins.
pub const SEARCH_INPUT_SELECTORS: &[&str] = &[
    "input[type=\"search\"]",
    "input[placeholder*=\"Search\"]",
    "input[placeholder*=\"search\"]",
    "input[name=\"search\"]",
    "input[aria-label*=\"Search\"]",
];

pub const HYDRATION_TIMEOUT: Duration = Duration::from_secs(15);
const HYDRATION_POLL: Duration = Duration::from_millis(250);
/// Time for the board's own search debounce to fire.
pub const FILTER_SETTLE: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub hydration_timeout: Duration,
    pub filter_settle: Duration,
    pub idle_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hydration_timeout: HYDRATION_TIMEOUT,
            filter_settle: FILTER_SETTLE,
            idle_timeout: crate::pagination::NETWORK_IDLE_TIMEOUT,
        }
    }
}

/// The board's listing route: `<base>/jobs` unless the base already ends there.
pub fn listing_url(base: &Url) -> Url {
    let path = base.path().trim_end_matches('/');
    if path.ends_with("/jobs") {
        return base.clone();
    }
    let mut listing = base.clone();
    listing.set_path(&format!("{}/jobs", path));
    listing
}

/// Navigates to the listing route and waits for client-side rendering. Returns
/// the listing URL that was opened.
pub async fn open_board(
    page: &dyn BoardPage,
    base: &Url,
    filter: Option<&str>,
    config: &SessionConfig,
) -> Result<Url> {
    let listing = listing_url(base);
    info!("Opening board at {}", listing);
    page.goto(listing.as_str()).await?;
    wait_for_hydration(page, config).await;

    if let Some(text) = filter.map(str::trim).filter(|t| !t.is_empty()) {
        apply_filter(page, text, config).await;
    }
    Ok(listing)
}

async fn wait_for_hydration(page: &dyn BoardPage, config: &SessionConfig) {
    let started = Instant::now();
    let markers = [GROUPED_CONTAINER, JOB_ITEM, JOB_LINK]
        .into_iter()
        .chain(SEARCH_INPUT_SELECTORS.iter().copied());

    'poll: loop {
        for marker in markers.clone() {
            match page.exists(marker).await {
                Ok(true) => {
                    debug!("Hydrated: {} present after {:?}", marker, started.elapsed());
                    break 'poll;
                }
                Ok(false) => {}
                Err(e) => debug!("Hydration probe for {} failed: {}", marker, e),
            }
        }
        if started.elapsed() >= config.hydration_timeout {
            info!(
                "No board markers after {:?}; continuing with whatever rendered",
                config.hydration_timeout
            );
            break;
        }
        tokio::time::sleep(HYDRATION_POLL).await;
    }

    if !page.wait_for_network_idle(config.idle_timeout).await {
        debug!("Network still busy after hydration");
    }
}

async fn apply_filter(page: &dyn BoardPage, text: &str, config: &SessionConfig) {
    let mut input = None;
    for selector in SEARCH_INPUT_SELECTORS {
        if page.exists(selector).await.unwrap_or(false) {
            input = Some(*selector);
            break;
        }
    }

    let Some(selector) = input else {
        info!("Search input not found; skipping filter {:?}", text);
        return;
    };

    info!("Filtering board by {:?} via {}", text, selector);
    if let Err(e) = page.type_into(selector, text).await {
        warn!("Could not type into {}: {}; continuing unfiltered", selector, e);
        return;
    }
    tokio::time::sleep(config.filter_settle).await;
    if !page.wait_for_network_idle(config.idle_timeout).await {
        debug!("Network still busy after filter settle");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockBoard, MockCall};

    fn fast() -> SessionConfig {
        SessionConfig {
            hydration_timeout: Duration::ZERO,
            filter_settle: Duration::ZERO,
            idle_timeout: Duration::ZERO,
        }
    }

    #[test]
    fn listing_route_appends_jobs() {
        let base = Url::parse("https://jobs.example.vc").unwrap();
        assert_eq!(listing_url(&base).as_str(), "https://jobs.example.vc/jobs");

        let base = Url::parse("https://talent.example.vc/portfolio/?q=1").unwrap();
        assert_eq!(listing_url(&base).as_str(), "https://talent.example.vc/portfolio/jobs?q=1");
    }

    #[test]
    fn listing_route_is_kept_when_present() {
        let base = Url::parse("https://jobs.example.vc/jobs/").unwrap();
        assert_eq!(listing_url(&base).as_str(), "https://jobs.example.vc/jobs/");
    }

    #[tokio::test]
    async fn filter_uses_first_matching_search_input() {
        let board = MockBoard::new()
            .with_items(3, vec![])
            .with_search_input(SEARCH_INPUT_SELECTORS[1])
            .with_search_input(SEARCH_INPUT_SELECTORS[3]);
        let base = Url::parse("https://jobs.example.vc").unwrap();

        open_board(&board, &base, Some("intern"), &fast()).await.unwrap();

        assert_eq!(board.visited(), vec!["https://jobs.example.vc/jobs".to_string()]);
        assert!(board.calls().contains(&MockCall::Typed {
            selector: SEARCH_INPUT_SELECTORS[1].to_string(),
            text: "intern".to_string(),
        }));
    }

    #[tokio::test]
    async fn missing_search_input_skips_the_filter() {
        let board = MockBoard::new().with_items(3, vec![]);
        let base = Url::parse("https://jobs.example.vc").unwrap();

        open_board(&board, &base, Some("intern"), &fast()).await.unwrap();

        assert!(!board.calls().iter().any(|c| matches!(c, MockCall::Typed { .. })));
    }

    #[tokio::test]
    async fn empty_board_still_opens_after_hydration_timeout() {
        let board = MockBoard::new();
        let base = Url::parse("https://jobs.example.vc").unwrap();
        let listing = open_board(&board, &base, None, &fast()).await.unwrap();
        assert_eq!(listing.as_str(), "https://jobs.example.vc/jobs");
    }
}
