use chrono::NaiveDate;
use std::fs;
use url::Url;

use crate::extractor::{DateExtractor, ParsedPage, discover_links, extract_content};
use crate::fetcher::PageResponse;

fn load(fixture: &str, url: &str) -> ParsedPage {
    let html = fs::read_to_string(format!("src/extractor/tests/fixtures/{}", fixture))
        .expect("Failed to read test fixture");
    let response = PageResponse::from_html(Url::parse(url).unwrap(), html);
    ParsedPage::parse(&response)
}

#[test]
fn test_article_page_pipeline() {
    let page = load("article.html", "https://herald.example.com/news/harbour");

    // script and style bodies never reach the visible text
    assert!(!page.text().contains("quantum-secret-token"));
    assert!(!page.text().contains("injected advert"));
    assert!(!page.text().contains("font-family"));
    assert!(page.text().contains("harbour expansion"));

    let content = extract_content(page.document()).unwrap();
    assert!(content.starts_with("Harbour expansion approved"));
    assert!(content.contains("excellent news for local fishermen"));
    assert!(!content.contains("Follow us"));

    let date = DateExtractor::default()
        .extract(page.document(), page.text())
        .unwrap();
    assert_eq!(date.date, NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
    assert_eq!(date.raw, "2024-03-18T09:30:00+01:00");

    let seed = Url::parse("https://herald.example.com/").unwrap();
    let links: Vec<String> = discover_links(page.document(), page.url(), &[seed])
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(
        links,
        vec![
            "https://herald.example.com/",
            "https://herald.example.com/news/",
            "https://herald.example.com/sports/",
            "https://herald.example.com/news/related/budget.html",
            "https://herald.example.com/news/harbour-timeline",
        ]
    );
}

#[test]
fn test_listing_page_uses_time_element_and_content_class() {
    let page = load("listing.html", "https://herald.example.com/latest");

    let date = DateExtractor::default()
        .extract(page.document(), page.text())
        .unwrap();
    assert_eq!(date.date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    assert_eq!(date.raw, "2024-02-01");

    let content = extract_content(page.document()).unwrap();
    assert!(content.starts_with("First story"));
    assert!(!content.contains("Home"));

    let seed = Url::parse("https://herald.example.com/").unwrap();
    assert_eq!(discover_links(page.document(), page.url(), &[seed]).len(), 3);
}

#[test]
fn test_malformed_html_degrades_gracefully() {
    let response = PageResponse::from_html(
        Url::parse("https://example.com/broken").unwrap(),
        "<html><head><title>Broken</title><body><p>Unclosed tags<div>More content <a href='/x'>x",
    );
    let page = ParsedPage::parse(&response);

    assert!(page.text().contains("Unclosed tags"));
    assert!(page.text().contains("More content"));
    assert_eq!(
        discover_links(page.document(), page.url(), std::slice::from_ref(page.url())).len(),
        1
    );
}

#[cfg(feature = "fuzz")]
mod robustness {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn extraction_never_panics(html in ".{0,512}") {
            let url = Url::parse("https://example.com/").unwrap();
            let page = ParsedPage::from_html(url.clone(), &html);
            let _ = extract_content(page.document());
            let _ = DateExtractor::default().extract(page.document(), page.text());
            let _ = discover_links(page.document(), page.url(), std::slice::from_ref(&url));
        }
    }
}
