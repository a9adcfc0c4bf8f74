use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static BASE: Lazy<Selector> = Lazy::new(|| Selector::parse("base[href]").unwrap());

/// Same scheme and host. Ports are not compared.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme() && a.host_str().is_some() && a.host_str() == b.host_str()
}

/// Hyperlinks on the page that stay on one of `origins`.
///
/// Relative targets resolve against `<base href>` when present, otherwise
/// against `page_url`. Fragments are dropped and each target appears once,
/// in document order.
pub fn discover_links(document: &Html, page_url: &Url, origins: &[Url]) -> Vec<Url> {
    let base = document
        .select(&BASE)
        .next()
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone());

    let mut seen = HashSet::new();
    document
        .select(&ANCHOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty() && !href.starts_with('#'))
        .filter_map(|href| base.join(href).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(|mut url| {
            url.set_fragment(None);
            url
        })
        .filter(|url| origins.iter().any(|origin| same_origin(url, origin)))
        .filter(|url| seen.insert(url.as_str().to_owned()))
        .collect()
}
