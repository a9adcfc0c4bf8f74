pub mod content;
pub mod dates;
pub mod language;
pub mod links;
pub mod model;

#[cfg(test)]
mod tests;

pub use content::{MAX_CONTENT_CHARS, extract_content};
pub use dates::{DateExtractor, DateOrder, DateParser, ExtractedDate, PermissiveDateParser};
pub use links::{discover_links, same_origin};

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::extractor::model::normalize_whitespace;
use crate::fetcher::PageResponse;

static NON_VISIBLE: Lazy<Selector> = Lazy::new(|| Selector::parse("script, style").unwrap());

/// An HTML page parsed once and shared by every per-page stage.
///
/// Script and style elements are removed at parse time, so both the keyword
/// matcher and the content extractor only ever see visible text. Malformed
/// markup never fails here; html5ever recovers the way browsers do.
pub struct ParsedPage {
    url: Url,
    document: Html,
    text: String,
}

impl ParsedPage {
    pub fn parse(response: &PageResponse) -> Self {
        Self::from_html(response.url_final.clone(), &response.body_utf8)
    }

    pub fn from_html(url: Url, html: &str) -> Self {
        let mut document = Html::parse_document(html);
        strip_non_visible(&mut document);
        let text = visible_text(&document);
        Self {
            url,
            document,
            text,
        }
    }

    /// URL the page was served from.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// All visible text of the document, whitespace collapsed.
    pub fn text(&self) -> &str {
        &self.text
    }
}

fn strip_non_visible(document: &mut Html) {
    let ids: Vec<_> = document.select(&NON_VISIBLE).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn visible_text(document: &Html) -> String {
    let pieces: Vec<&str> = document.root_element().text().collect();
    normalize_whitespace(&pieces.join(" "))
}
