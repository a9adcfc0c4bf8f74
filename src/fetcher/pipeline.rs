use crate::fetcher::types::PageResponse;
use chrono::Utc;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

pub fn process_response(url_final: Url, status: StatusCode, body_bytes: &[u8]) -> PageResponse {
    let (body_utf8, lossy) = decode_forced_utf8(body_bytes);
    if lossy {
        debug!(url = %url_final, "body contained invalid UTF-8, replaced");
    }

    PageResponse {
        url_final,
        status,
        body_utf8,
        lossy,
        fetched_at: Utc::now(),
    }
}

/// Decode as UTF-8 whatever the page declares. A leading BOM is dropped and
/// malformed sequences become U+FFFD.
fn decode_forced_utf8(body_bytes: &[u8]) -> (String, bool) {
    let (decoded, _encoding, had_errors) = encoding_rs::UTF_8.decode(body_bytes);
    (decoded.into_owned(), had_errors)
}

/// Whether a `Content-Type` value describes an HTML document.
pub fn is_html_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml")
}
