use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{
    CardSink, GROUPED_CONTAINER_SELECTOR, JOB_ITEM_SELECTOR, first_text, parse_selector, read_job,
    text_of,
};
use crate::models::CompanyMeta;

static HEADER_SELECTOR: Lazy<Selector> = Lazy::new(|| parse_selector(".grouped-job-result-header"));
static COMPANY_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| parse_selector(".job-list-job-company-link, .grouped-job-result-company-name"));
static DESCRIPTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| parse_selector(".grouped-job-result-company-description"));
static STAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| parse_selector(".job-list-badge-stage"));
static SIZE_SELECTOR: Lazy<Selector> = Lazy::new(|| parse_selector(".job-list-badge-size"));
static INDUSTRY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| parse_selector(".job-list-badge-industries .job-list-badge"));
static HQ_SELECTOR: Lazy<Selector> = Lazy::new(|| parse_selector(".job-list-badge-hq"));

pub(super) fn extract(document: &Html, base: &Url, sink: &mut CardSink) {
    for group in document.select(&GROUPED_CONTAINER_SELECTOR) {
        // Metadata lives in the header when there is one; older boards put the
        // badges directly in the container.
        let header = group.select(&HEADER_SELECTOR).next().unwrap_or(group);
        let (company, meta) = read_company(header);

        for element in group.select(&JOB_ITEM_SELECTOR) {
            let mut card = read_job(element, base, company.clone());
            card.company_meta = Some(meta.clone());
            sink.push(card);
        }
    }
}

fn read_company(header: ElementRef<'_>) -> (String, CompanyMeta) {
    let link = header.select(&COMPANY_LINK_SELECTOR).next();
    let name = link.map(text_of).unwrap_or_default();
    let slug = link
        .and_then(|a| a.value().attr("href"))
        .and_then(slug_from_href)
        .unwrap_or_else(|| slugify(&name));

    let industries: BTreeSet<String> = header
        .select(&INDUSTRY_SELECTOR)
        .map(text_of)
        .filter(|industry| !industry.is_empty())
        .collect();

    let meta = CompanyMeta {
        slug,
        description: first_text(header, &DESCRIPTION_SELECTOR),
        stage: first_text(header, &STAGE_SELECTOR),
        size: first_text(header, &SIZE_SELECTOR),
        industries,
        hq_location: first_text(header, &HQ_SELECTOR),
    };
    (name, meta)
}

/// `/companies/<slug>` or `/companies/<slug>/...`.
fn slug_from_href(href: &str) -> Option<String> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    segments.find(|s| *s == "companies")?;
    segments.next().map(str::to_string)
}

fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
