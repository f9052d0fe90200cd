use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use super::{CardSink, JOB_ITEM_SELECTOR, first_text, parse_selector, read_job};

static COMPANY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| parse_selector(".job-list-job-company-link, .job-list-job-company-name"));
static LOGO_SELECTOR: Lazy<Selector> = Lazy::new(|| parse_selector("img[alt]"));

pub(super) fn extract(document: &Html, base: &Url, sink: &mut CardSink) {
    for element in document.select(&JOB_ITEM_SELECTOR) {
        let mut company = first_text(element, &COMPANY_SELECTOR);
        if company.is_empty() {
            company = element
                .select(&LOGO_SELECTOR)
                .filter_map(|img| img.value().attr("alt"))
                .map(logo_company_name)
                .find(|name| !name.is_empty())
                .unwrap_or_default();
        }
        sink.push(read_job(element, base, company));
    }
}

/// Logo alt text is usually "<Company> logo".
fn logo_company_name(alt: &str) -> String {
    let alt = alt.trim();
    let name = alt
        .strip_suffix(" logo")
        .or_else(|| alt.strip_suffix(" Logo"))
        .unwrap_or(alt);
    name.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_suffix_is_stripped() {
        assert_eq!(logo_company_name("Acme logo"), "Acme");
        assert_eq!(logo_company_name(" Globex "), "Globex");
    }

    #[test]
    fn company_falls_back_to_logo_alt() {
        let html = r#"
            <div class="job-list-job">
              <img src="/logo.png" alt="Initech logo">
              <h2 class="job-list-job-title"><a href="/jobs/9">QA Intern</a></h2>
            </div>"#;
        let base = Url::parse("https://board.example.com").unwrap();
        let mut sink = CardSink::default();
        extract(&Html::parse_document(html), &base, &mut sink);
        let cards = sink.into_cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].company, "Initech");
        assert_eq!(cards[0].detail_url, "https://board.example.com/jobs/9");
    }
}
