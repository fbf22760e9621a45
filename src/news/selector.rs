//! One news selection run: fetch, filter, de-duplicate, cap, remember.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use secrecy::SecretString;
use tracing::{info, instrument, warn};

use crate::config::{NewsConfig, NewsSettings};
use crate::error::DigestError;
use crate::news::history::HistoryStore;
use crate::news::newsapi::NewsApiClient;
use crate::news::relevance::is_relevant;
use crate::news::{Article, NewsQuery, NewsSource, SelectedArticle};

/// Outcome of a selection run. Only `Selected` has touched the history.
#[derive(Debug)]
pub enum Selection {
    Selected(Vec<SelectedArticle>),
    MissingCredential,
    FetchFailed(DigestError),
    /// The history file exists but could not be read; it is left as is.
    HistoryUnreadable(DigestError),
}

impl Selection {
    pub fn articles(&self) -> &[SelectedArticle] {
        match self {
            Self::Selected(articles) => articles,
            Self::MissingCredential | Self::FetchFailed(_) | Self::HistoryUnreadable(_) => {
                &[]
            }
        }
    }

    pub fn into_articles(self) -> Vec<SelectedArticle> {
        match self {
            Self::Selected(articles) => articles,
            Self::MissingCredential | Self::FetchFailed(_) | Self::HistoryUnreadable(_) => {
                Vec::new()
            }
        }
    }
}

pub struct NewsSelector {
    source: Box<dyn NewsSource>,
    history: HistoryStore,
    settings: NewsSettings,
}

impl NewsSelector {
    pub fn new(settings: &NewsSettings, source: Box<dyn NewsSource>) -> Self {
        Self {
            source,
            history: HistoryStore::new(&settings.history_path),
            settings: settings.clone(),
        }
    }

    fn query(&self, today: NaiveDate) -> NewsQuery {
        NewsQuery {
            query: self.settings.query.clone(),
            from: today - Duration::days(self.settings.lookback_days),
            language: self.settings.language.clone(),
            page_size: self.settings.page_size,
        }
    }

    /// Run one selection. A failed fetch or an unreadable history file
    /// leaves the history untouched; a failed save is logged and the
    /// selection is still returned.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn run(&self, today: NaiveDate) -> Selection {
        let candidates = match self.source.search(&self.query(today)).await {
            Ok(candidates) => candidates,
            Err(e) => {
                let err = DigestError::network(&e);
                warn!(error = %err, "Failed to fetch news");
                return Selection::FetchFailed(err);
            }
        };

        let mut sent = match self.history.load() {
            Ok(sent) => sent,
            Err(e) => {
                warn!(error = %e, "Failed to read sent-article history");
                return Selection::HistoryUnreadable(e);
            }
        };
        let selected = select_from_batch(&candidates, &sent, self.settings.max_articles);

        sent.extend(selected.iter().map(|a| a.url.clone()));
        if let Err(e) = self.history.save(&sent) {
            warn!(
                path = %self.history.path().display(),
                error = %e,
                "Failed to save sent-article history"
            );
        }

        info!(
            candidates = candidates.len(),
            selected = selected.len(),
            history = sent.len(),
            "News selection completed"
        );

        Selection::Selected(selected)
    }
}

/// Walk the batch in order and keep the first `max` relevant articles
/// whose URL was not sent before. Later candidates are never examined.
pub fn select_from_batch(
    candidates: &[Article],
    previously_sent: &HashSet<String>,
    max: usize,
) -> Vec<SelectedArticle> {
    let mut selected: Vec<SelectedArticle> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for article in candidates {
        if selected.len() >= max {
            break;
        }
        if !is_relevant(article) {
            continue;
        }
        if previously_sent.contains(&article.url) || !seen.insert(article.url.as_str()) {
            continue;
        }
        selected.push(SelectedArticle::from(article));
    }

    selected
}

/// Validate the credential, build the NewsAPI client and run a selection.
/// Nothing touches the history unless the credential is present.
pub async fn select_news(
    settings: &NewsSettings,
    api_key: Option<&SecretString>,
    today: NaiveDate,
) -> Selection {
    let config = match NewsConfig::from_parts(settings, api_key) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Skipping news selection");
            return Selection::MissingCredential;
        }
    };

    let client = match NewsApiClient::new(&config.settings.base_url, config.api_key) {
        Ok(client) => client,
        Err(e) => {
            let err = DigestError::network(&e);
            warn!(error = %err, "Failed to build news client");
            return Selection::FetchFailed(err);
        }
    };

    NewsSelector::new(&config.settings, Box::new(client))
        .run(today)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(n: u32, title: &str) -> Article {
        Article {
            title: title.to_string(),
            description: None,
            url: format!("https://x/{n}"),
            source_name: "Wire".to_string(),
            published_at: None,
        }
    }

    #[test]
    fn test_caps_at_max_in_input_order() {
        let batch: Vec<Article> = (1..=8).map(|n| article(n, "Oil update")).collect();
        let selected = select_from_batch(&batch, &HashSet::new(), 5);
        let urls: Vec<&str> = selected.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://x/1", "https://x/2", "https://x/3", "https://x/4", "https://x/5"]
        );
    }

    #[test]
    fn test_skips_irrelevant_and_previously_sent() {
        let batch = vec![
            article(1, "Solar farm opens"),
            article(2, "Football results"),
            article(3, "Grid stress"),
        ];
        let sent: HashSet<String> = ["https://x/1".to_string()].into_iter().collect();

        let selected = select_from_batch(&batch, &sent, 5);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].url, "https://x/3");
        assert_eq!(selected[0].source, "Wire");
    }

    #[test]
    fn test_duplicate_url_within_batch_selected_once() {
        let batch = vec![article(1, "Oil"), article(1, "Oil again"), article(2, "Gas")];
        let selected = select_from_batch(&batch, &HashSet::new(), 5);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].title, "Oil");
    }

    #[test]
    fn test_zero_cap_selects_nothing() {
        let batch = vec![article(1, "Oil")];
        assert!(select_from_batch(&batch, &HashSet::new(), 0).is_empty());
    }

    #[test]
    fn test_selection_into_articles() {
        assert!(Selection::MissingCredential.into_articles().is_empty());
        let failed = Selection::FetchFailed(DigestError::Network("boom".to_string()));
        assert!(failed.articles().is_empty());
        let unreadable = Selection::HistoryUnreadable(DigestError::Network("boom".to_string()));
        assert!(unreadable.into_articles().is_empty());
    }
}
