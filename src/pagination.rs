//! Drives "load more" / infinite scroll until the visible item count stops
//! growing.
//!
//! The stop condition is a heuristic, not a fixed point: the loop gives up
//! after [`STALE_ROUND_THRESHOLD`] consecutive rounds without growth. A board
//! that takes longer than `settle + idle_timeout` to append items for that many
//! rounds in a row is truncated. Raising the constants trades speed for
//! completeness.

use std::time::Duration;

use log::{debug, info, warn};

use crate::error::Result;
use crate::extract::{JOB_ITEM, JOB_LINK};
use crate::page::BoardPage;

/// Consecutive non-growing rounds before the loop stops.
pub const STALE_ROUND_THRESHOLD: u32 = 3;
/// Fixed wait after each trigger, before checking for network idle.
pub const SETTLE_INTERVAL: Duration = Duration::from_millis(1500);
/// Upper bound on the best-effort network-idle wait per round.
pub const NETWORK_IDLE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub stale_rounds: u32,
    pub settle: Duration,
    pub idle_timeout: Duration,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            stale_rounds: STALE_ROUND_THRESHOLD,
            settle: SETTLE_INTERVAL,
            idle_timeout: NETWORK_IDLE_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationReport {
    pub rounds: u32,
    pub items: usize,
}

/// Items currently visible: job elements, or `/jobs/` anchors on boards
/// without them.
pub async fn visible_items(page: &dyn BoardPage) -> Result<usize> {
    let items = page.count(JOB_ITEM).await?;
    if items > 0 {
        return Ok(items);
    }
    page.count(JOB_LINK).await
}

pub async fn load_all(page: &dyn BoardPage, config: &PaginationConfig) -> Result<PaginationReport> {
    let mut rounds = 0;
    let mut stale = 0;
    let mut items = match visible_items(page).await {
        Ok(items) => items,
        Err(e) => {
            warn!("Could not count visible items ({}); starting from zero", e);
            0
        }
    };
    info!("Starting pagination with {} visible items", items);

    while stale < config.stale_rounds {
        rounds += 1;
        let before = items;

        let clicked = match page.click_load_more().await {
            Ok(clicked) => clicked,
            Err(e) => {
                info!("Load-more control unusable ({}), scrolling instead", e);
                false
            }
        };
        if !clicked {
            if let Err(e) = page.scroll_to_bottom().await {
                stale += 1;
                info!(
                    "Round {}: scroll failed ({}); counted as stale {}/{}",
                    rounds, e, stale, config.stale_rounds
                );
                continue;
            }
        }

        tokio::time::sleep(config.settle).await;
        if !page.wait_for_network_idle(config.idle_timeout).await {
            debug!("Network did not go idle within {:?}", config.idle_timeout);
        }

        match visible_items(page).await {
            Ok(count) => items = count,
            Err(e) => info!("Round {}: item count failed ({}); keeping {}", rounds, e, items),
        }
        if items > before {
            stale = 0;
        } else {
            stale += 1;
        }
        info!(
            "Round {}: {} items via {} (stale {}/{})",
            rounds,
            items,
            if clicked { "load more" } else { "scroll" },
            stale,
            config.stale_rounds
        );
    }

    info!("Pagination converged after {} rounds with {} items", rounds, items);
    Ok(PaginationReport { rounds, items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockBoard, MockCall};

    fn fast() -> PaginationConfig {
        PaginationConfig {
            settle: Duration::ZERO,
            idle_timeout: Duration::ZERO,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn stops_three_rounds_after_growth_ends() {
        let board = MockBoard::new().with_load_more(true).with_items(20, vec![20, 20, 20, 20]);
        let report = load_all(&board, &fast()).await.unwrap();
        assert_eq!(report.rounds, 4 + STALE_ROUND_THRESHOLD);
        assert_eq!(report.items, 100);
    }

    #[tokio::test]
    async fn growth_resets_the_stale_counter() {
        let board = MockBoard::new().with_items(10, vec![5, 0, 0, 5]);
        let report = load_all(&board, &fast()).await.unwrap();
        assert_eq!(report.rounds, 7);
        assert_eq!(report.items, 20);
    }

    #[tokio::test]
    async fn static_board_converges_after_threshold() {
        let board = MockBoard::new().with_items(12, vec![]);
        let report = load_all(&board, &fast()).await.unwrap();
        assert_eq!(report.rounds, STALE_ROUND_THRESHOLD);
        assert_eq!(report.items, 12);
    }

    #[tokio::test]
    async fn scrolls_when_there_is_no_load_more_control() {
        let board = MockBoard::new().with_items(5, vec![5]);
        load_all(&board, &fast()).await.unwrap();
        let calls = board.calls();
        assert!(calls.contains(&MockCall::Scroll));
        assert!(!calls.contains(&MockCall::LoadMore));
    }

    #[tokio::test]
    async fn failed_scrolls_count_as_stale_rounds() {
        let board = MockBoard::new().with_items(8, vec![4]).with_failing_scroll();
        let report = load_all(&board, &fast()).await.unwrap();
        assert_eq!(report.rounds, STALE_ROUND_THRESHOLD);
        assert_eq!(report.items, 8);
    }

    #[tokio::test]
    async fn failed_counts_keep_the_previous_total() {
        let board = MockBoard::new()
            .with_load_more(true)
            .with_items(6, vec![6])
            .with_failing_count(1);
        let report = load_all(&board, &fast()).await.unwrap();
        assert_eq!(report.rounds, 2 + STALE_ROUND_THRESHOLD);
        assert_eq!(report.items, 12);
    }

    #[tokio::test]
    async fn threshold_is_overridable() {
        let board = MockBoard::new().with_items(5, vec![5]);
        let config = PaginationConfig {
            stale_rounds: 1,
            ..fast()
        };
        let report = load_all(&board, &config).await.unwrap();
        assert_eq!(report.rounds, 2);
    }
}
