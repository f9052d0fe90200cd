use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use super::{CardSink, JOB_LINK, parse_selector, resolve_url, text_of};
use crate::models::JobCard;

static JOB_LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| parse_selector(JOB_LINK));

/// Anchor texts that disclose more content rather than name a job.
const DISCLOSURE_LABELS: &[&str] = &[
    "read more",
    "learn more",
    "see more",
    "show more",
    "view more",
    "view all",
    "load more",
];

pub(super) fn extract(document: &Html, base: &Url, sink: &mut CardSink) {
    for anchor in document.select(&JOB_LINK_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !names_a_job(href) {
            continue;
        }
        let title = text_of(anchor);
        if is_disclosure_label(&title) {
            continue;
        }
        let Some(detail_url) = resolve_url(base, href) else {
            continue;
        };
        sink.push(JobCard {
            title,
            detail_url,
            ..Default::default()
        });
    }
}

/// `/jobs/` must be followed by something; the listing route itself is not a job.
fn names_a_job(href: &str) -> bool {
    href.split_once("/jobs/")
        .map(|(_, rest)| {
            let path = rest.split(['?', '#']).next().unwrap_or_default();
            !path.trim_matches('/').is_empty()
        })
        .unwrap_or(false)
}

fn is_disclosure_label(text: &str) -> bool {
    let lower = text.to_lowercase();
    DISCLOSURE_LABELS.iter().any(|label| lower.starts_with(label))
}
