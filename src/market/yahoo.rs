//! Yahoo Finance chart API client.
//!
//! Pulls the last week of daily bars per symbol. Only the fields the
//! market table needs are decoded.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::market::{DailyBar, QuoteSource};

/// Yahoo rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) energy-digest/0.1";

pub struct YahooChart {
    client: reqwest::Client,
    base_url: String,
}

impl YahooChart {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl QuoteSource for YahooChart {
    #[instrument(skip(self))]
    async fn daily_bars(&self, symbol: &str) -> Result<Vec<DailyBar>> {
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_url,
            urlencoding::encode(symbol)
        );

        let response = self
            .client
            .get(&url)
            .query(&[("range", "7d"), ("interval", "1d")])
            .send()
            .await
            .context("Yahoo chart request failed")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read Yahoo chart response")?;

        // Error payloads still carry the chart envelope, so try it first
        let parsed: ChartResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => bail!("Yahoo chart error ({status}): {body}"),
            Err(e) => return Err(e).context("Failed to parse Yahoo chart response"),
        };

        if let Some(err) = parsed.chart.error {
            bail!("Yahoo chart error ({}): {}", err.code, err.description);
        }
        if !status.is_success() {
            bail!("Yahoo chart error ({status}): {body}");
        }

        let result = parsed
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| anyhow!("Yahoo chart returned no result for {symbol}"))?;

        let bars = result.into_bars();
        debug!(bars = bars.len(), "Yahoo chart fetched");
        Ok(bars)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

// --- Response Types ---

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteArrays>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteArrays {
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

impl ChartResult {
    /// Zip the parallel arrays into bars, dropping any day with a null
    /// high, low or close (Yahoo emits those for halted sessions).
    fn into_bars(self) -> Vec<DailyBar> {
        let quote = self.indicators.quote.into_iter().next().unwrap_or_default();
        let at = |values: &[Option<f64>], i: usize| {
            values.get(i).copied().flatten().and_then(Decimal::from_f64)
        };

        self.timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                Some(DailyBar {
                    timestamp: DateTime::<Utc>::from_timestamp(ts, 0)?,
                    high: at(&quote.high, i)?,
                    low: at(&quote.low, i)?,
                    close: at(&quote.close, i)?,
                })
            })
            .collect()
    }
}
