//! Detail-page enrichment with rate limiting and periodic checkpoints.

use std::path::PathBuf;
use std::time::Duration;

use log::{info, warn};
use url::Url;

use crate::checkpoint::{self, CHECKPOINT_EVERY};
use crate::detail::extract_detail;
use crate::error::Result;
use crate::models::JobCard;
use crate::page::BoardPage;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);
/// Jobs processed between the longer batch pauses.
pub const BATCH_SIZE: usize = 50;
pub const BATCH_PAUSE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichOptions {
    /// Wait after every attempt, successful or not.
    pub delay: Duration,
    pub batch_size: usize,
    pub batch_pause: Duration,
    /// Where progress is saved; `None` disables checkpoints.
    pub checkpoint: Option<PathBuf>,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            batch_size: BATCH_SIZE,
            batch_pause: BATCH_PAUSE,
            checkpoint: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichReport {
    pub attempted: usize,
    pub enriched: usize,
    /// Pages that loaded but yielded no detail fields.
    pub empty: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Visits each job's detail page from `start` onwards and merges what it finds
/// into the card. Per-job failures are logged and leave the card as it was.
pub async fn enrich(
    page: &dyn BoardPage,
    jobs: &mut [JobCard],
    start: usize,
    options: &EnrichOptions,
) -> EnrichReport {
    let mut report = EnrichReport::default();
    let total = jobs.len();
    if start > 0 {
        info!("Resuming enrichment at job {}/{}", start + 1, total);
    }

    for index in start..total {
        let url = jobs[index].detail_url.clone();
        if url.is_empty() {
            report.skipped += 1;
            continue;
        }

        report.attempted += 1;
        match enrich_one(page, &mut jobs[index], &url).await {
            Ok(false) => {
                report.empty += 1;
                warn!("[{}/{}] Nothing to extract from {}", index + 1, total, url);
            }
            Ok(true) => {
                report.enriched += 1;
                info!("[{}/{}] Enriched {}", index + 1, total, jobs[index].title);
                if report.enriched % CHECKPOINT_EVERY == 0 {
                    save_checkpoint(options, jobs, index);
                }
            }
            Err(e) => {
                report.failed += 1;
                warn!("[{}/{}] Failed to enrich {}: {}", index + 1, total, url, e);
            }
        }

        tokio::time::sleep(options.delay).await;
        if options.batch_size > 0 && report.attempted % options.batch_size == 0 {
            info!("Processed {} detail pages; pausing {:?}", report.attempted, options.batch_pause);
            tokio::time::sleep(options.batch_pause).await;
        }
    }

    report
}

/// Returns whether the page yielded any detail fields.
async fn enrich_one(page: &dyn BoardPage, job: &mut JobCard, url: &str) -> Result<bool> {
    let page_url = Url::parse(url)?;
    page.goto(url).await?;
    let html = page.html().await?;
    let fields = extract_detail(&html, &page_url);
    if fields.is_empty() {
        return Ok(false);
    }
    job.absorb(fields);
    Ok(true)
}

fn save_checkpoint(options: &EnrichOptions, jobs: &[JobCard], index: usize) {
    let Some(path) = &options.checkpoint else {
        return;
    };
    match checkpoint::save(path, jobs, index) {
        Ok(()) => info!("Checkpoint saved at job {}", index + 1),
        Err(e) => warn!("Failed to save checkpoint {}: {}", path.display(), e),
    }
}
