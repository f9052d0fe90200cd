use std::collections::BTreeSet;

use board_scraper::classify::retain_us_interns;
use board_scraper::detail::extract_detail;
use board_scraper::extract::{Layout, extract_cards};
use url::Url;

fn base() -> Url {
    Url::parse("https://jobs.example.vc").unwrap()
}

#[test]
fn flat_board_extracts_every_card_once() {
    let extraction = extract_cards(include_str!("fixtures/flat_board.html"), &base());
    assert_eq!(extraction.layout, Layout::Flat);

    let titles: Vec<&str> = extraction.cards.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Software Engineering Intern",
            "Data Intern",
            "Backend Intern",
            "Senior Software Engineer",
            "Product Design INTERN",
        ]
    );

    let first = &extraction.cards[0];
    assert_eq!(first.company, "Acme");
    assert_eq!(
        first.detail_url,
        "https://jobs.example.vc/companies/acme/jobs/101-software-engineering-intern"
    );
    assert_eq!(first.location, "San Francisco, CA");
    assert_eq!(first.tags, vec!["Engineering", "Python", "React"]);
    assert_eq!(first.salary.as_deref(), Some("$45 – $55 / hour"));
    assert!(first.company_meta.is_none());

    let globex = &extraction.cards[1];
    assert_eq!(globex.company, "Globex");
    assert_eq!(globex.detail_url, "https://careers.globex.com/jobs/202");
    assert_eq!(globex.location, "");
    assert_eq!(globex.tags, vec!["Remote"]);
}

#[test]
fn flat_board_filters_to_us_interns() {
    let extraction = extract_cards(include_str!("fixtures/flat_board.html"), &base());
    let kept: Vec<String> = retain_us_interns(&extraction.cards)
        .into_iter()
        .map(|c| c.title)
        .collect();
    assert_eq!(
        kept,
        vec!["Software Engineering Intern", "Data Intern", "Product Design INTERN"]
    );
}

#[test]
fn grouped_board_shares_company_metadata() {
    let extraction = extract_cards(include_str!("fixtures/grouped_board.html"), &base());
    assert_eq!(extraction.layout, Layout::Grouped);
    assert_eq!(extraction.cards.len(), 4);

    let controls = &extraction.cards[0];
    assert_eq!(controls.company, "Acme Robotics");
    assert_eq!(controls.title, "Controls Intern");
    assert_eq!(controls.tags, vec!["Engineering"]);
    let meta = controls.company_meta.as_ref().unwrap();
    assert_eq!(meta.slug, "acme-robotics");
    assert_eq!(meta.description, "Robots that fold laundry.");
    assert_eq!(meta.stage, "Series B");
    assert_eq!(meta.size, "51-200 employees");
    assert_eq!(meta.hq_location, "Pittsburgh, PA");
    assert_eq!(
        meta.industries,
        BTreeSet::from(["Consumer".to_string(), "Robotics".to_string()])
    );

    let growth = &extraction.cards[3];
    assert_eq!(growth.company, "Northwind");
    assert_eq!(growth.salary.as_deref(), Some("$30/hr"));
    assert_eq!(growth.company_meta.as_ref().unwrap().stage, "Seed");

    let kept: Vec<String> = retain_us_interns(&extraction.cards)
        .into_iter()
        .map(|c| c.title)
        .collect();
    assert_eq!(kept, vec!["Controls Intern", "Growth Internship"]);
}

#[test]
fn unknown_board_falls_back_to_job_links() {
    let extraction = extract_cards(include_str!("fixtures/link_board.html"), &base());
    assert_eq!(extraction.layout, Layout::Links);

    let cards: Vec<(&str, &str)> = extraction
        .cards
        .iter()
        .map(|c| (c.title.as_str(), c.detail_url.as_str()))
        .collect();
    assert_eq!(
        cards,
        vec![
            ("Firmware Intern", "https://jobs.example.vc/jobs/7001"),
            ("Security Engineering Intern", "https://ats.example.com/o/jobs/7003"),
            ("Account Executive", "https://jobs.example.vc/jobs/7004"),
        ]
    );
    assert!(!extraction.cards.iter().any(|c| c.title.starts_with("Read more")));
}

#[test]
fn detail_page_fields() {
    let page = Url::parse("https://jobs.example.vc/companies/acme/jobs/101-software-engineering-intern")
        .unwrap();
    let fields = extract_detail(include_str!("fixtures/detail_page.html"), &page);

    let description = fields.description.unwrap();
    assert!(description.starts_with("Acme interns work alongside senior engineers"));
    assert_eq!(
        fields.requirements,
        vec![
            "Pursuing a BS or MS in Computer Science",
            "Experience with Python or TypeScript",
        ]
    );
    assert_eq!(fields.salary.as_deref(), Some("$45 – $55 / hour"));
    assert_eq!(fields.apply_url.as_deref(), Some("https://jobs.example.vc/apply/101"));
    assert_eq!(fields.company.as_deref(), Some("Acme"));
    assert_eq!(fields.location.as_deref(), Some("San Francisco, CA"));
}
