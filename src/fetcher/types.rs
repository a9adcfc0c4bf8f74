use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use url::Url;

/// A successfully fetched HTML page.
#[derive(Debug, Clone)]
pub struct PageResponse {
    /// URL after redirects; relative links on the page resolve against it.
    pub url_final: Url,
    pub status: StatusCode,
    /// Body decoded as UTF-8 regardless of the declared charset.
    pub body_utf8: String,
    /// True when invalid UTF-8 sequences were replaced during decoding.
    pub lossy: bool,
    pub fetched_at: DateTime<Utc>,
}

impl PageResponse {
    /// Build a response from an in-memory HTML string.
    pub fn from_html(url: Url, html: impl Into<String>) -> Self {
        let body_utf8 = html.into();
        Self {
            url_final: url,
            status: StatusCode::OK,
            body_utf8,
            lossy: false,
            fetched_at: Utc::now(),
        }
    }
}
