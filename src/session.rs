use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

use crate::crawl::{CrawlRequest, PageRecord};
use crate::matcher::MatchLogic;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("session i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A saved search: what was asked for and what matched.
///
/// Extracted content is not persisted; results keep url, date, raw date
/// and sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub name: String,
    pub keywords: Vec<String>,
    pub logic: MatchLogic,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub results: Vec<PageRecord>,
}

impl SessionRecord {
    pub fn new(name: impl Into<String>, request: &CrawlRequest, matches: &[PageRecord]) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            keywords: request.keywords().to_vec(),
            logic: request.logic(),
            date_from: request.date_from(),
            date_to: request.date_to(),
            created_at: Utc::now(),
            results: matches.iter().map(PageRecord::without_content).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        tokio::fs::write(path, self.to_json()?).await?;
        Ok(())
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ExtractedDate;
    use url::Url;

    fn sample() -> SessionRecord {
        let request = CrawlRequest::builder("https://example.com", ["harbour", "council"])
            .logic(MatchLogic::And)
            .date_from(NaiveDate::from_ymd_opt(2024, 1, 1))
            .build()
            .unwrap();
        let record = PageRecord::new(Url::parse("https://example.com/a").unwrap(), 200)
            .with_date(Some(ExtractedDate {
                date: NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
                raw: "18 March 2024".to_string(),
            }))
            .with_content(Some("The harbour plan went to the council".to_string()));
        SessionRecord::new("harbour watch", &request, &[record])
    }

    #[test]
    fn test_content_is_not_persisted() {
        let session = sample();
        assert_eq!(session.results.len(), 1);
        assert_eq!(session.results[0].content(), None);
        assert_eq!(session.results[0].date().unwrap().raw, "18 March 2024");

        let json = session.to_json().unwrap();
        assert!(!json.contains("harbour plan went"));
        assert!(json.contains("\"logic\": \"AND\""));
    }

    #[test]
    fn test_json_round_trip() {
        let session = sample();
        let restored = SessionRecord::from_json(&session.to_json().unwrap()).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            SessionRecord::from_json("{not json"),
            Err(SessionError::Serde(_))
        ));
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("sitewatch-session-{}.json", Uuid::new_v4()));
        let session = sample();
        session.save(&path).await.unwrap();
        let loaded = SessionRecord::load(&path).await.unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, session);
    }
}
