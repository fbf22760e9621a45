pub mod history;
pub mod newsapi;
pub mod relevance;
pub mod selector;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An article as returned by the news source. Read-only input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    /// Unique key used for de-duplication across runs.
    pub url: String,
    pub source_name: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// The projection of an [`Article`] that ends up in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedArticle {
    pub title: String,
    pub url: String,
    pub source: String,
}

impl From<&Article> for SelectedArticle {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            url: article.url.clone(),
            source: article.source_name.clone(),
        }
    }
}

/// Parameters for one search against the news source.
#[derive(Debug, Clone)]
pub struct NewsQuery {
    pub query: String,
    /// Earliest publish date, inclusive.
    pub from: NaiveDate,
    pub language: String,
    pub page_size: u32,
}

/// Trait for the external news search. Results come back newest first.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn search(&self, query: &NewsQuery) -> Result<Vec<Article>>;

    /// Human-readable name of this source.
    fn name(&self) -> &str;
}
