//! Publication date discovery.
//!
//! Three sources are tried in order and the first that yields a parseable
//! date wins:
//!
//! 1. `<meta>` tags from [`META_DATE_TAGS`], matched on `name` then `property`
//! 2. `<time>` elements, `datetime` attribute before text content
//! 3. the first ISO `YYYY-MM-DD` run in the visible text
//!
//! Parsing of the raw strings is delegated to a [`DateParser`] so callers can
//! inject locale-specific behaviour.

use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Meta tag names that commonly carry a publication date.
pub const META_DATE_TAGS: [&str; 7] = [
    "article:published_time",
    "date",
    "pubdate",
    "publishdate",
    "timestamp",
    "dc.date",
    "dcterms.created",
];

static META: Lazy<Selector> = Lazy::new(|| Selector::parse("meta[content]").unwrap());
static TIME: Lazy<Selector> = Lazy::new(|| Selector::parse("time").unwrap());

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4}-\d{2}-\d{2})").unwrap());
static ORDINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").unwrap());
static WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(mon|tue|tues|wed|thu|thur|thurs|fri|sat|sun)[a-z]*\.?,?\s+").unwrap()
});
static LEAD_IN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(published|posted|updated|last updated|date)(\s+on)?\s*:?\s*").unwrap()
});
static RELATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+|an?)\s+(second|minute|hour|day|week|month|year)s?\s+ago$").unwrap()
});
static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,4})[/.\-](\d{1,2})[/.\-](\d{1,4})$").unwrap());

/// A publication date together with the exact string it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDate {
    pub date: NaiveDate,
    pub raw: String,
}

/// Turns a free-form date string into a calendar date.
pub trait DateParser: Send + Sync {
    fn parse(&self, raw: &str) -> Option<NaiveDate>;
}

/// How ambiguous all-numeric dates such as `03/04/2024` are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateOrder {
    #[default]
    DayFirst,
    MonthFirst,
}

/// Accepts most date spellings found on news sites.
#[derive(Debug, Clone, Default)]
pub struct PermissiveDateParser {
    order: DateOrder,
    reference: Option<NaiveDate>,
}

impl PermissiveDateParser {
    pub fn new(order: DateOrder) -> Self {
        Self {
            order,
            reference: None,
        }
    }

    /// Resolve relative phrases ("yesterday", "3 days ago") against `date`
    /// instead of the current UTC date.
    pub fn with_reference(mut self, date: NaiveDate) -> Self {
        self.reference = Some(date);
        self
    }

    fn today(&self) -> NaiveDate {
        self.reference.unwrap_or_else(|| Utc::now().date_naive())
    }

    fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
            return Some(dt.date_naive());
        }
        for format in ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
            if let Ok(dt) = DateTime::parse_from_str(raw, format) {
                return Some(dt.date_naive());
            }
        }
        for format in [
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M",
        ] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(dt.date());
            }
        }
        None
    }

    fn parse_relative(&self, lowered: &str) -> Option<NaiveDate> {
        let today = self.today();
        match lowered {
            "today" | "now" | "just now" => return Some(today),
            "yesterday" => return today.pred_opt(),
            _ => {}
        }

        let caps = RELATIVE.captures(lowered)?;
        let amount: u32 = match &caps[1] {
            "a" | "an" => 1,
            n => n.parse().ok()?,
        };
        match &caps[2] {
            "second" | "minute" | "hour" => Some(today),
            "day" => today.checked_sub_signed(Duration::days(amount.into())),
            "week" => today.checked_sub_signed(Duration::weeks(amount.into())),
            "month" => today.checked_sub_months(Months::new(amount)),
            "year" => today.checked_sub_months(Months::new(amount.checked_mul(12)?)),
            _ => None,
        }
    }

    fn parse_numeric(&self, cleaned: &str) -> Option<NaiveDate> {
        let caps = NUMERIC.captures(cleaned)?;
        let a: u32 = caps[1].parse().ok()?;
        let b: u32 = caps[2].parse().ok()?;
        let c: u32 = caps[3].parse().ok()?;

        if caps[1].len() == 4 {
            return NaiveDate::from_ymd_opt(a as i32, b, c);
        }
        if caps[3].len() != 4 {
            return None;
        }
        let (day, month) = match self.order {
            DateOrder::DayFirst => (a, b),
            DateOrder::MonthFirst => (b, a),
        };
        NaiveDate::from_ymd_opt(c as i32, month, day)
            // 25/12/2024 under month-first (or the reverse) is unambiguous
            .or_else(|| NaiveDate::from_ymd_opt(c as i32, day, month))
    }

    fn parse_worded(cleaned: &str) -> Option<NaiveDate> {
        const FORMATS: [&str; 4] = ["%B %d %Y", "%d %B %Y", "%Y %B %d", "%B %Y %d"];

        let without_commas = cleaned.replace(',', " ");
        let tokens: Vec<&str> = without_commas.split_whitespace().collect();
        if tokens.len() < 3 {
            return None;
        }

        // Trailing times ("10:30 AM", "GMT") are dropped by looking only at
        // the first three tokens once the whole string fails.
        let candidates = [tokens.join(" "), tokens[..3].join(" ")];
        candidates.iter().find_map(|candidate| {
            let candidate = candidate.trim_end_matches('.');
            FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(candidate, format).ok())
        })
    }
}

impl DateParser for PermissiveDateParser {
    fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Some(date) = Self::parse_timestamp(raw) {
            return Some(date);
        }

        let lowered = raw.to_lowercase();
        if let Some(date) = self.parse_relative(&lowered) {
            return Some(date);
        }

        let cleaned = LEAD_IN.replace(raw, "");
        let cleaned = WEEKDAY.replace(&cleaned, "");
        let cleaned = ORDINAL.replace_all(&cleaned, "$1");
        let cleaned = cleaned.trim();

        if let Some(date) = Self::parse_timestamp(cleaned) {
            return Some(date);
        }
        if let Some(date) = self.parse_numeric(cleaned) {
            return Some(date);
        }
        if cleaned.len() == 8 && cleaned.bytes().all(|b| b.is_ascii_digit()) {
            return NaiveDate::parse_from_str(cleaned, "%Y%m%d").ok();
        }
        if let Some(date) = Self::parse_worded(cleaned) {
            return Some(date);
        }

        // Last resort: an ISO date embedded in otherwise unparseable text
        ISO_DATE
            .find(cleaned)
            .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok())
    }
}

/// Finds a page's publication date using the configured [`DateParser`].
#[derive(Clone)]
pub struct DateExtractor {
    parser: Arc<dyn DateParser>,
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new(Arc::new(PermissiveDateParser::default()))
    }
}

impl DateExtractor {
    pub fn new(parser: Arc<dyn DateParser>) -> Self {
        Self { parser }
    }

    /// `text` is the page's visible text, used for the final regex scan.
    pub fn extract(&self, document: &Html, text: &str) -> Option<ExtractedDate> {
        self.from_meta(document)
            .or_else(|| self.from_time_elements(document))
            .or_else(|| self.from_text(text))
    }

    fn parsed(&self, raw: &str) -> Option<ExtractedDate> {
        let raw = raw.trim();
        self.parser.parse(raw).map(|date| ExtractedDate {
            date,
            raw: raw.to_string(),
        })
    }

    fn from_meta(&self, document: &Html) -> Option<ExtractedDate> {
        META_DATE_TAGS.iter().find_map(|tag| {
            ["name", "property"].iter().find_map(|attr| {
                let meta = document
                    .select(&META)
                    .find(|el| el.value().attr(attr) == Some(*tag))?;
                let content = meta.value().attr("content")?;
                self.parsed(content)
            })
        })
    }

    fn from_time_elements(&self, document: &Html) -> Option<ExtractedDate> {
        document.select(&TIME).find_map(|time| {
            time.value()
                .attr("datetime")
                .and_then(|datetime| self.parsed(datetime))
                .or_else(|| {
                    let text = time.text().collect::<String>();
                    self.parsed(&text)
                })
        })
    }

    fn from_text(&self, text: &str) -> Option<ExtractedDate> {
        ISO_DATE
            .find_iter(text)
            .find_map(|m| self.parsed(m.as_str()))
    }
}
