//! NewsAPI `everything` search client.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::news::{Article, NewsQuery, NewsSource};

pub struct NewsApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl NewsApiClient {
    pub fn new(base_url: &str, api_key: SecretString) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("energy-digest/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    #[instrument(skip(self, query), fields(q = %query.query, from = %query.from))]
    async fn search(&self, query: &NewsQuery) -> Result<Vec<Article>> {
        let url = format!("{}/v2/everything", self.base_url);
        let params = [
            ("q", query.query.clone()),
            ("from", query.from.format("%Y-%m-%d").to_string()),
            ("sortBy", "publishedAt".to_string()),
            ("language", query.language.clone()),
            ("pageSize", query.page_size.to_string()),
            ("apiKey", self.api_key.expose_secret().to_string()),
        ];

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .context("News API request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            bail!("News API error ({}): {}", status, error_body);
        }

        let body: EverythingResponse = response
            .json()
            .await
            .context("Failed to parse News API response")?;

        let articles: Vec<Article> = body
            .articles
            .into_iter()
            .filter_map(WireArticle::into_article)
            .collect();

        debug!(articles = articles.len(), "News API search completed");
        Ok(articles)
    }

    fn name(&self) -> &str {
        "newsapi"
    }
}

// --- Response Types ---

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<WireArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArticle {
    #[serde(default)]
    source: WireSource,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireSource {
    name: Option<String>,
}

impl WireArticle {
    /// Articles without a URL cannot be de-duplicated and are dropped.
    fn into_article(self) -> Option<Article> {
        let url = self.url.filter(|u| !u.is_empty())?;
        let published_at = self
            .published_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Some(Article {
            title: self.title.unwrap_or_default(),
            description: self.description,
            url,
            source_name: self.source.name.unwrap_or_default(),
            published_at,
        })
    }
}
