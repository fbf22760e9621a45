use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::Parser;

use energy_digest::config::{AppConfig, DEFAULT_CONFIG_PATH};
use energy_digest::market::yahoo::YahooChart;
use energy_digest::market::{fetch_market_rows, MARKET_HEADERS};
use energy_digest::monitoring::logger;
use energy_digest::news::selector::select_news;
use energy_digest::{mail, report};

/// Daily energy market report: quotes, fresh news, one email.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Print the summary but do not send the email. Selected articles are
    /// still recorded as sent.
    #[arg(long)]
    no_email: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, secrets) = AppConfig::load(&cli.config)?;

    logger::init_logging(&config.monitoring)?;

    tracing::info!(
        tickers = config.market.tickers.len(),
        history = %config.news.history_path.display(),
        "Energy digest starting"
    );

    let rows = match YahooChart::new(&config.market.base_url) {
        Ok(source) => fetch_market_rows(&source, &config.market.tickers).await,
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "Failed to build quote client");
            Vec::new()
        }
    };

    let today = Local::now().date_naive();
    let articles = select_news(&config.news, secrets.news_api_key.as_ref(), today)
        .await
        .into_articles();

    if rows.is_empty() {
        tracing::warn!("No market data available");
        return Ok(());
    }

    println!("\nFormatted Market Data:\n");
    print!("{}", report::render_console(&MARKET_HEADERS, &rows));

    println!("\nTop Suggested Articles:\n");
    print!("{}", report::console_articles(&articles));

    if cli.no_email {
        tracing::info!("Email disabled by --no-email");
        return Ok(());
    }

    let html = report::render_html(&MARKET_HEADERS, &rows, &articles);
    mail::deliver_report(&config.mail, &secrets, html).await;

    Ok(())
}
