//! Field extraction from a job's detail page.
//!
//! Each field walks an ordered chain of selectors and takes the first element
//! that clears the field's length floor.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::extract::{parse_selector, resolve_url, text_of};
use crate::models::DetailFields;

/// Shorter descriptions are boilerplate ("Apply now", cookie banners).
pub const MIN_DESCRIPTION_CHARS: usize = 50;
pub const MAX_DESCRIPTION_CHARS: usize = 5000;
pub const MIN_REQUIREMENT_CHARS: usize = 5;
pub const MAX_REQUIREMENT_CHARS: usize = 300;
pub const MAX_REQUIREMENTS: usize = 20;

static DESCRIPTION_CHAIN: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        "[data-testid=\"job-description\"]",
        ".job-description",
        "[class*=\"job-description\"]",
        "[class*=\"description\"]",
        "[class*=\"content\"] article",
        "article",
        "main",
    ]
    .into_iter()
    .map(parse_selector)
    .collect()
});

static REQUIREMENT_ITEMS: Lazy<Selector> = Lazy::new(|| {
    parse_selector(
        "[class*=\"requirement\"] li, [class*=\"qualification\"] li, \
         [class*=\"description\"] li, article li",
    )
});

static SALARY_CHAIN: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        "[data-testid=\"salary\"]",
        "[class*=\"salary\"]",
        "[class*=\"compensation\"]",
        "[class*=\"pay-range\"]",
    ]
    .into_iter()
    .map(parse_selector)
    .collect()
});

static APPLY_CHAIN: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        "a[data-testid=\"apply-button\"]",
        "a[class*=\"apply\"]",
        "a[href*=\"/apply\"]",
        "a[href*=\"apply\"]",
    ]
    .into_iter()
    .map(parse_selector)
    .collect()
});

static ANCHOR: Lazy<Selector> = Lazy::new(|| parse_selector("a[href]"));

static COMPANY_CHAIN: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        "[data-testid=\"company-name\"]",
        "[class*=\"company-name\"]",
        "[class*=\"companyName\"]",
    ]
    .into_iter()
    .map(parse_selector)
    .collect()
});

static LOCATION_CHAIN: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        "[data-testid=\"job-location\"]",
        "[class*=\"job-location\"]",
        "[class*=\"location\"]",
    ]
    .into_iter()
    .map(parse_selector)
    .collect()
});

/// Extracts enrichment fields from a detail page snapshot. `page_url` is the
/// detail URL and anchors relative apply links.
pub fn extract_detail(html: &str, page_url: &Url) -> DetailFields {
    let document = Html::parse_document(html);

    let description = first_match(&document, &DESCRIPTION_CHAIN, |text| {
        text.chars().count() > MIN_DESCRIPTION_CHARS
    })
    .map(|text| truncate_chars(&text, MAX_DESCRIPTION_CHARS));

    DetailFields {
        description,
        requirements: requirements(&document),
        salary: first_match(&document, &SALARY_CHAIN, |text| !text.is_empty() && text.len() <= 200),
        apply_url: apply_url(&document, page_url),
        company: first_match(&document, &COMPANY_CHAIN, |text| !text.is_empty() && text.len() <= 120),
        location: first_match(&document, &LOCATION_CHAIN, |text| !text.is_empty() && text.len() <= 120),
    }
}

fn first_match(document: &Html, chain: &[Selector], accept: impl Fn(&str) -> bool) -> Option<String> {
    chain
        .iter()
        .flat_map(|selector| document.select(selector))
        .map(text_of)
        .find(|text| accept(text))
}

fn requirements(document: &Html) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for text in document.select(&REQUIREMENT_ITEMS).map(text_of) {
        let len = text.chars().count();
        if !(MIN_REQUIREMENT_CHARS..=MAX_REQUIREMENT_CHARS).contains(&len) || items.contains(&text) {
            continue;
        }
        items.push(text);
        if items.len() == MAX_REQUIREMENTS {
            break;
        }
    }
    items
}

fn apply_url(document: &Html, page_url: &Url) -> Option<String> {
    let by_selector = APPLY_CHAIN
        .iter()
        .flat_map(|selector| document.select(selector))
        .filter_map(|a| a.value().attr("href"))
        .find_map(|href| resolve_url(page_url, href));
    by_selector.or_else(|| {
        document
            .select(&ANCHOR)
            .filter(|a| text_of(*a).to_lowercase().starts_with("apply"))
            .filter_map(|a| a.value().attr("href"))
            .find_map(|href| resolve_url(page_url, href))
    })
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://jobs.example.vc/companies/acme/jobs/42-intern").unwrap()
    }

    #[test]
    fn short_candidates_fall_through_the_chain() {
        let long = "You will build data pipelines and ship features used by thousands of customers.";
        let html = format!(
            r#"<div class="job-description">Apply now</div><article><p>{long}</p></article>"#
        );
        let fields = extract_detail(&html, &url());
        assert_eq!(fields.description.as_deref(), Some(long));
    }

    #[test]
    fn description_is_capped() {
        let html = format!(r#"<div class="job-description">{}</div>"#, "x".repeat(6000));
        let fields = extract_detail(&html, &url());
        assert_eq!(fields.description.map(|d| d.len()), Some(MAX_DESCRIPTION_CHARS));
    }

    #[test]
    fn requirements_are_windowed_and_capped() {
        let mut items = String::from("<li>ok</li>");
        items.push_str(&format!("<li>{}</li>", "y".repeat(400)));
        for i in 0..30 {
            items.push_str(&format!("<li>Requirement number {i}</li>"));
        }
        let html = format!(r#"<div class="requirements"><ul>{items}</ul></div>"#);
        let fields = extract_detail(&html, &url());
        assert_eq!(fields.requirements.len(), MAX_REQUIREMENTS);
        assert_eq!(fields.requirements[0], "Requirement number 0");
    }

    #[test]
    fn apply_link_resolves_relative_to_the_page() {
        let html = r#"<a class="btn" href="/apply/42">Apply for this job</a>"#;
        let fields = extract_detail(html, &url());
        assert_eq!(fields.apply_url.as_deref(), Some("https://jobs.example.vc/apply/42"));
    }

    #[test]
    fn apply_link_by_text_when_no_selector_matches() {
        let html = r#"<a href="https://ats.example.com/j/42">Apply now</a>"#;
        let fields = extract_detail(html, &url());
        assert_eq!(fields.apply_url.as_deref(), Some("https://ats.example.com/j/42"));
    }

    #[test]
    fn empty_page_yields_nothing() {
        assert!(extract_detail("<html><body></body></html>", &url()).is_empty());
    }
}
