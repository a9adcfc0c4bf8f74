//! Per-user crawl preferences and the store they live in.
//!
//! The crawl engine never sees users; preferences are turned into plain
//! request parameters with [`UserPreferences::apply`].

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::crawl::CrawlRequestBuilder;
use crate::sentiment::{SentimentAnalyzer, SentimentMethod, analyzer_for};

pub type UserId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TranslationQuality {
    #[default]
    Standard,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub max_pages: usize,
    pub site_timeout_secs: u64,
    pub translation_quality: TranslationQuality,
    pub summary_length: SummaryLength,
    pub sentiment_method: SentimentMethod,
    pub sentiment_enabled: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            max_pages: 100,
            site_timeout_secs: 120,
            translation_quality: TranslationQuality::default(),
            summary_length: SummaryLength::default(),
            sentiment_method: SentimentMethod::default(),
            sentiment_enabled: true,
        }
    }
}

impl UserPreferences {
    /// Copy the crawl limits onto a request under construction.
    pub fn apply(&self, builder: CrawlRequestBuilder) -> CrawlRequestBuilder {
        builder
            .max_pages(self.max_pages)
            .site_timeout(Duration::from_secs(self.site_timeout_secs))
    }

    /// The analyzer to score matches with, if scoring is enabled.
    pub fn analyzer(&self) -> Option<Arc<dyn SentimentAnalyzer>> {
        self.sentiment_enabled
            .then(|| analyzer_for(self.sentiment_method))
    }
}

#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("preferences storage error: {0}")]
    Storage(String),

    #[error("invalid preferences: {0}")]
    Invalid(String),
}

#[async_trait]
pub trait PreferencesStore: Send + Sync {
    async fn get_preferences(&self, user_id: UserId) -> Result<Option<UserPreferences>, PreferencesError>;

    async fn save_preferences(
        &self,
        user_id: UserId,
        preferences: &UserPreferences,
    ) -> Result<(), PreferencesError>;

    /// Stored preferences, or the defaults for a user with none.
    async fn preferences_or_default(&self, user_id: UserId) -> Result<UserPreferences, PreferencesError> {
        Ok(self.get_preferences(user_id).await?.unwrap_or_default())
    }
}

/// Process-local store, suitable for tests and single-run tools.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPreferencesStore {
    entries: Arc<DashMap<UserId, UserPreferences>>,
}

impl InMemoryPreferencesStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferencesStore for InMemoryPreferencesStore {
    async fn get_preferences(&self, user_id: UserId) -> Result<Option<UserPreferences>, PreferencesError> {
        Ok(self.entries.get(&user_id).map(|entry| entry.value().clone()))
    }

    async fn save_preferences(
        &self,
        user_id: UserId,
        preferences: &UserPreferences,
    ) -> Result<(), PreferencesError> {
        if preferences.max_pages == 0 {
            return Err(PreferencesError::Invalid("max_pages must be at least 1".to_string()));
        }
        if preferences.site_timeout_secs == 0 {
            return Err(PreferencesError::Invalid(
                "site_timeout_secs must be greater than zero".to_string(),
            ));
        }
        self.entries.insert(user_id, preferences.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::CrawlRequest;

    #[tokio::test]
    async fn test_defaults_for_unknown_user() {
        let store = InMemoryPreferencesStore::new();
        assert_eq!(store.get_preferences(7).await.unwrap(), None);

        let prefs = store.preferences_or_default(7).await.unwrap();
        assert_eq!(prefs.max_pages, 100);
        assert_eq!(prefs.site_timeout_secs, 120);
        assert_eq!(prefs.translation_quality, TranslationQuality::Standard);
        assert_eq!(prefs.summary_length, SummaryLength::Medium);
        assert_eq!(prefs.sentiment_method, SentimentMethod::Vader);
        assert!(prefs.sentiment_enabled);
    }

    #[tokio::test]
    async fn test_save_and_overwrite() {
        let store = InMemoryPreferencesStore::new();
        let mut prefs = UserPreferences {
            max_pages: 25,
            ..UserPreferences::default()
        };
        store.save_preferences(1, &prefs).await.unwrap();
        prefs.sentiment_method = SentimentMethod::Hybrid;
        store.save_preferences(1, &prefs).await.unwrap();

        let stored = store.get_preferences(1).await.unwrap().unwrap();
        assert_eq!(stored.max_pages, 25);
        assert_eq!(stored.sentiment_method, SentimentMethod::Hybrid);
    }

    #[tokio::test]
    async fn test_rejects_zero_limits() {
        let store = InMemoryPreferencesStore::new();
        let prefs = UserPreferences {
            max_pages: 0,
            ..UserPreferences::default()
        };
        assert!(matches!(
            store.save_preferences(1, &prefs).await,
            Err(PreferencesError::Invalid(_))
        ));
        assert_eq!(store.get_preferences(1).await.unwrap(), None);
    }

    #[test]
    fn test_apply_to_request() {
        let prefs = UserPreferences {
            max_pages: 10,
            site_timeout_secs: 30,
            sentiment_enabled: false,
            ..UserPreferences::default()
        };
        let request = prefs
            .apply(CrawlRequest::builder("https://example.com", ["alpha"]))
            .build()
            .unwrap();

        assert_eq!(request.max_pages(), 10);
        assert_eq!(request.site_timeout(), Duration::from_secs(30));
        assert!(prefs.analyzer().is_none());
        assert_eq!(
            UserPreferences::default().analyzer().map(|a| a.method()),
            Some(SentimentMethod::Vader)
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let prefs: UserPreferences = serde_json::from_str(r#"{"max_pages": 5}"#).unwrap();
        assert_eq!(prefs.max_pages, 5);
        assert_eq!(prefs.site_timeout_secs, 120);
    }
}
