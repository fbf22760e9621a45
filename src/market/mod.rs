//! Daily quotes for the energy ticker table.

pub mod yahoo;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::Ticker;

/// Column headers of the market table, in row order.
pub const MARKET_HEADERS: [&str; 6] = ["Asset", "Price", "Change", "% Change", "High", "Low"];

/// One daily bar: the high, low and close the market table reads.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBar {
    pub timestamp: DateTime<Utc>,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

/// Pre-formatted table row, one cell per entry of [`MARKET_HEADERS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketRow {
    pub asset: String,
    pub price: String,
    pub change: String,
    pub pct_change: String,
    pub high: String,
    pub low: String,
}

impl MarketRow {
    pub fn cells(&self) -> [&str; 6] {
        [
            self.asset.as_str(),
            self.price.as_str(),
            self.change.as_str(),
            self.pct_change.as_str(),
            self.high.as_str(),
            self.low.as_str(),
        ]
    }
}

/// Trait for a source of daily bars. Bars come back oldest first.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn daily_bars(&self, symbol: &str) -> Result<Vec<DailyBar>>;

    fn name(&self) -> &str;
}

/// Build the table row for a ticker from its last two bars.
/// Returns `None` when there is nothing to compare against.
pub fn market_row(ticker: &Ticker, bars: &[DailyBar]) -> Option<MarketRow> {
    let [.., previous, latest] = bars else {
        return None;
    };
    if previous.close.is_zero() {
        return None;
    }

    let abs_change = latest.close - previous.close;
    let pct_change = abs_change / previous.close * Decimal::ONE_HUNDRED;

    Some(MarketRow {
        asset: format!("{} ({})", ticker.name, ticker.symbol),
        price: format!("${}", money(latest.close)),
        change: signed(abs_change),
        pct_change: format!("{}%", signed(pct_change)),
        high: format!("${}", money(latest.high)),
        low: format!("${}", money(latest.low)),
    })
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Sign comes from the unrounded value, so a tiny loss shows as `-0.00`.
fn signed(value: Decimal) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() {
        '-'
    } else {
        '+'
    };
    format!("{sign}{:.2}", value.round_dp(2).abs())
}

/// Fetch every ticker in order. A failing or empty ticker is logged and
/// left out of the table.
pub async fn fetch_market_rows(source: &dyn QuoteSource, tickers: &[Ticker]) -> Vec<MarketRow> {
    let mut rows = Vec::with_capacity(tickers.len());

    for ticker in tickers {
        match source.daily_bars(&ticker.symbol).await {
            Ok(bars) => match market_row(ticker, &bars) {
                Some(row) => rows.push(row),
                None => {
                    warn!(
                        symbol = %ticker.symbol,
                        name = %ticker.name,
                        bars = bars.len(),
                        "Not enough data for ticker"
                    );
                }
            },
            Err(e) => {
                warn!(
                    source = source.name(),
                    symbol = %ticker.symbol,
                    error = %e,
                    "Failed to fetch quotes for ticker"
                );
            }
        }
    }

    info!(tickers = tickers.len(), rows = rows.len(), "Market data fetched");
    rows
}
