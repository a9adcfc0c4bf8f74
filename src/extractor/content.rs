use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::extractor::model::{normalize_whitespace, truncate_chars};

/// Upper bound on extracted content, in characters.
pub const MAX_CONTENT_CHARS: usize = 2000;
/// Anything shorter is treated as "no content".
const MIN_CONTENT_CHARS: usize = 10;

/// Likely article containers, most specific first.
const CONTENT_SELECTORS: [&str; 8] = [
    "article",
    ".article-content",
    ".news-content",
    ".post-content",
    ".entry-content",
    ".content",
    "main",
    ".main-content",
];

static CONTENT: Lazy<Vec<Selector>> = Lazy::new(|| {
    CONTENT_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});

static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

/// Main readable text of a page, capped at [`MAX_CONTENT_CHARS`].
///
/// The first selector in the priority list that matches an element with
/// text wins; otherwise the whole body (or document) is used. Returns
/// `None` when there is nothing meaningful to return.
pub fn extract_content(document: &Html) -> Option<String> {
    let text = CONTENT
        .iter()
        .find_map(|selector| {
            document
                .select(selector)
                .map(element_text)
                .find(|text| !text.is_empty())
        })
        .or_else(|| document.select(&BODY).next().map(element_text))
        .unwrap_or_else(|| element_text(document.root_element()));

    if text.chars().count() < MIN_CONTENT_CHARS {
        return None;
    }

    Some(truncate_chars(&text, MAX_CONTENT_CHARS).to_string())
}

fn element_text(element: ElementRef<'_>) -> String {
    let pieces: Vec<&str> = element.text().collect();
    normalize_whitespace(&pieces.join(" "))
}
