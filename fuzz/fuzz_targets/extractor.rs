#![no_main]

use libfuzzer_sys::fuzz_target;
use reqwest::StatusCode;
use url::Url;

use sitewatch::extractor::{DateExtractor, ParsedPage, discover_links, extract_content};
use sitewatch::fetcher::pipeline::process_response;
use sitewatch::matcher::{MatchLogic, matches_keywords};

fuzz_target!(|data: &[u8]| {
    let url = Url::parse("https://example.com").unwrap();
    let response = process_response(url.clone(), StatusCode::OK, data);

    // No stage of page processing may panic, whatever the bytes
    let page = ParsedPage::parse(&response);
    let _ = matches_keywords(page.text(), &["news"], MatchLogic::Or);
    let _ = extract_content(page.document());
    let _ = DateExtractor::default().extract(page.document(), page.text());
    let _ = discover_links(page.document(), page.url(), &[url]);
});
