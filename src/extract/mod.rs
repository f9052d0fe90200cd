//! Converts a rendered board snapshot into job cards.
//!
//! Extraction runs on serialized markup rather than inside the browser, so every
//! layout can be exercised against fixture HTML. A structural probe picks one
//! [`Layout`] per board; each variant yields the full unfiltered card set.

mod flat;
mod grouped;
mod links;

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::models::JobCard;

/// Company-grouped result container.
pub const GROUPED_CONTAINER: &str = ".grouped-job-result";
/// A single job element in either card layout.
pub const JOB_ITEM: &str = ".job-list-job";
/// Anchors the link heuristic treats as candidate cards.
pub const JOB_LINK: &str = "a[href*=\"/jobs/\"]";

static GROUPED_CONTAINER_SELECTOR: Lazy<Selector> = Lazy::new(|| parse_selector(GROUPED_CONTAINER));
static JOB_ITEM_SELECTOR: Lazy<Selector> = Lazy::new(|| parse_selector(JOB_ITEM));
static TITLE_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| parse_selector(".job-list-job-title a, a.job-list-job-title"));
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| parse_selector(".job-list-job-title"));
static LOCATION_SELECTOR: Lazy<Selector> = Lazy::new(|| parse_selector(".job-list-badge-locations"));
static DEPARTMENT_SELECTOR: Lazy<Selector> = Lazy::new(|| parse_selector(".job-list-badge-departments"));
static REMOTE_SELECTOR: Lazy<Selector> = Lazy::new(|| parse_selector(".job-list-badge-remote"));
static SKILL_TAG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| parse_selector(".job-list-badge-tags .job-list-badge, .job-list-skill-tag"));
static SALARY_SELECTOR: Lazy<Selector> = Lazy::new(|| parse_selector(".job-list-badge-salary"));

pub(crate) fn parse_selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e:?}"))
}

/// Board layout families, chosen by [`Layout::probe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Company containers holding shared metadata and job sub-elements.
    Grouped,
    /// Self-contained job elements.
    Flat,
    /// Unknown board: any anchor into a `/jobs/` path is a candidate card.
    Links,
}

impl Layout {
    pub fn probe(document: &Html) -> Self {
        if document.select(&GROUPED_CONTAINER_SELECTOR).next().is_some() {
            Layout::Grouped
        } else if document.select(&JOB_ITEM_SELECTOR).next().is_some() {
            Layout::Flat
        } else {
            Layout::Links
        }
    }

    pub fn extract(self, document: &Html, base: &Url) -> Vec<JobCard> {
        let mut sink = CardSink::default();
        match self {
            Layout::Grouped => grouped::extract(document, base, &mut sink),
            Layout::Flat => flat::extract(document, base, &mut sink),
            Layout::Links => links::extract(document, base, &mut sink),
        }
        sink.into_cards()
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layout::Grouped => "grouped",
            Layout::Flat => "flat",
            Layout::Links => "link-fallback",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub layout: Layout,
    pub cards: Vec<JobCard>,
}

/// Probes the snapshot's layout and extracts every card on the board.
pub fn extract_cards(html: &str, base: &Url) -> Extraction {
    let document = Html::parse_document(html);
    let layout = Layout::probe(&document);
    let cards = layout.extract(&document, base);
    Extraction { layout, cards }
}

/// Collects cards, discarding empty titles and repeated detail URLs as they
/// arrive.
#[derive(Default)]
pub(crate) struct CardSink {
    seen: HashSet<String>,
    cards: Vec<JobCard>,
}

impl CardSink {
    pub(crate) fn push(&mut self, card: JobCard) -> bool {
        if card.title.trim().is_empty() {
            return false;
        }
        if !card.detail_url.is_empty() && !self.seen.insert(card.detail_url.clone()) {
            return false;
        }
        self.cards.push(card);
        true
    }

    pub(crate) fn into_cards(self) -> Vec<JobCard> {
        self.cards
    }
}

/// Resolves an href against the board's base URL. Absolute hrefs are returned
/// unchanged.
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }
    match Url::parse(href) {
        Ok(_) => Some(href.to_string()),
        Err(_) => base.join(href).ok().map(String::from),
    }
}

/// Text content with whitespace runs collapsed.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

pub(crate) fn first_text(element: ElementRef<'_>, selector: &Selector) -> String {
    element.select(selector).map(text_of).find(|text| !text.is_empty()).unwrap_or_default()
}

/// Reads the job-specific fields shared by flat and grouped job elements.
pub(crate) fn read_job(element: ElementRef<'_>, base: &Url, company: String) -> JobCard {
    let link = element.select(&TITLE_LINK_SELECTOR).next();
    let mut title = link.map(text_of).unwrap_or_default();
    if title.is_empty() {
        title = first_text(element, &TITLE_SELECTOR);
    }
    let detail_url = link
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| resolve_url(base, href))
        .unwrap_or_default();

    let mut tags = Vec::new();
    for selector in [&*DEPARTMENT_SELECTOR, &*REMOTE_SELECTOR] {
        let badge = first_text(element, selector);
        if !badge.is_empty() {
            tags.push(badge);
        }
    }
    for skill in element.select(&SKILL_TAG_SELECTOR).map(text_of) {
        if !skill.is_empty() && !tags.contains(&skill) {
            tags.push(skill);
        }
    }

    let salary = element.select(&SALARY_SELECTOR).next().and_then(|badge| {
        let tooltip = badge
            .value()
            .attr("data-tooltip")
            .or_else(|| badge.value().attr("title"))
            .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|t| !t.is_empty());
        tooltip.or_else(|| Some(text_of(badge)).filter(|t| !t.is_empty()))
    });

    JobCard {
        company,
        title,
        location: first_text(element, &LOCATION_SELECTOR),
        tags,
        detail_url,
        salary,
        ..Default::default()
    }
}
