//! One scrape run: open the board, paginate, extract, filter, optionally
//! enrich, write the output.

use std::path::Path;

use chrono::Utc;
use log::{info, warn};

use crate::checkpoint;
use crate::classify::retain_us_interns;
use crate::config::{Config, RunMode};
use crate::discover::discover;
use crate::enrich::{EnrichReport, enrich};
use crate::error::{AppError, Result};
use crate::extract::extract_cards;
use crate::models::{JobCard, ScrapeMetadata, ScrapeOutput};
use crate::output::write_output;
use crate::page::BoardPage;
use crate::pagination::load_all;
use crate::session::open_board;

/// Runs whichever mode the config selects against an open page.
pub async fn execute(page: &dyn BoardPage, config: &Config) -> Result<()> {
    match config.mode {
        RunMode::Scrape => scrape(page, config).await.map(|_| ()),
        RunMode::Discover => discover(page, config).await.map(|_| ()),
    }
}

pub async fn scrape(page: &dyn BoardPage, config: &Config) -> Result<ScrapeOutput> {
    let output_path = config
        .output
        .as_deref()
        .ok_or_else(|| AppError::ConfigError("an output path is required to scrape".to_string()))?;

    open_board(page, &config.board_url, config.filter.as_deref(), &config.session()).await?;
    load_all(page, &config.pagination).await?;

    let html = page.html().await?;
    let extraction = extract_cards(&html, &config.board_url);
    let total = extraction.cards.len();
    info!("Extracted {} cards using the {} layout", total, extraction.layout);

    let mut jobs = retain_us_interns(&extraction.cards);
    info!("{} of {} cards are US internships", jobs.len(), total);

    let mut report = None;
    if config.scrape_details {
        let options = config.enrich_options();
        let start = match options.checkpoint.as_deref() {
            Some(path) => resume_point(config, path, &mut jobs),
            None => 0,
        };
        report = Some(enrich(page, &mut jobs, start, &options).await);
    }

    let output = ScrapeOutput {
        metadata: ScrapeMetadata {
            board_url: config.board_url_arg.clone(),
            vc_firm: config.firm.clone(),
            scraped_at: Utc::now(),
            total_jobs_on_board: total,
            us_intern_jobs: jobs.len(),
        },
        jobs,
    };
    log_summary(&output, report.as_ref());

    write_output(output_path, &output)?;
    info!("Wrote {} jobs to {}", output.jobs.len(), output_path.display());

    if config.scrape_details {
        if let Some(path) = config.enrich_options().checkpoint {
            checkpoint::remove(&path)?;
        }
    }
    Ok(output)
}

fn resume_point(config: &Config, path: &Path, jobs: &mut [JobCard]) -> usize {
    if !config.resume {
        if path.exists() {
            warn!(
                "Found checkpoint {} from an interrupted run; pass --resume to continue from it",
                path.display()
            );
        }
        return 0;
    }
    match checkpoint::load(path) {
        Some(saved) => checkpoint::merge_into(jobs, &saved),
        None => 0,
    }
}

fn log_summary(output: &ScrapeOutput, report: Option<&EnrichReport>) {
    info!(
        "Summary for {}: {} jobs on board, {} US internships",
        output.metadata.vc_firm, output.metadata.total_jobs_on_board, output.metadata.us_intern_jobs
    );
    if let Some(report) = report {
        info!(
            "Enrichment: {} attempted, {} enriched, {} empty, {} failed, {} without a detail URL",
            report.attempted, report.enriched, report.empty, report.failed, report.skipped
        );
    }
}
