use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;

use crate::error::DigestError;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub news: NewsSettings,
    pub market: MarketSettings,
    pub mail: MailSettings,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsSettings {
    pub base_url: String,
    pub query: String,
    pub language: String,
    pub page_size: u32,
    pub max_articles: usize,
    pub lookback_days: i64,
    pub history_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketSettings {
    pub base_url: String,
    pub tickers: Vec<Ticker>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Ticker {
    pub symbol: String,
    pub name: String,
}

impl Ticker {
    pub fn new(symbol: &str, name: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailSettings {
    pub smtp_host: String,
    pub subject: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: String,
}

/// Secrets loaded exclusively from environment variables.
/// Not serializable, not stored in config files.
pub struct Secrets {
    pub news_api_key: Option<SecretString>,
    pub email_address: Option<String>,
    pub email_password: Option<SecretString>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self {
            news_api_key: non_empty_env("NEWS_API_KEY").map(SecretString::from),
            email_address: non_empty_env("EMAIL_ADDRESS"),
            email_password: non_empty_env("EMAIL_PASSWORD").map(SecretString::from),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Everything the news selector needs for one run, credential included.
#[derive(Debug, Clone)]
pub struct NewsConfig {
    pub settings: NewsSettings,
    pub api_key: SecretString,
}

impl NewsConfig {
    /// Fails eagerly when `NEWS_API_KEY` is absent.
    pub fn from_parts(
        settings: &NewsSettings,
        api_key: Option<&SecretString>,
    ) -> Result<Self, DigestError> {
        let api_key = api_key
            .cloned()
            .ok_or(DigestError::MissingCredential("NEWS_API_KEY"))?;
        Ok(Self {
            settings: settings.clone(),
            api_key,
        })
    }
}

/// SMTP account and relay for the report email.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub subject: String,
    pub address: String,
    pub password: SecretString,
}

impl MailConfig {
    pub fn from_parts(settings: &MailSettings, secrets: &Secrets) -> Result<Self, DigestError> {
        let address = secrets
            .email_address
            .clone()
            .ok_or(DigestError::MissingCredential("EMAIL_ADDRESS"))?;
        let password = secrets
            .email_password
            .clone()
            .ok_or(DigestError::MissingCredential("EMAIL_PASSWORD"))?;
        Ok(Self {
            smtp_host: settings.smtp_host.clone(),
            subject: settings.subject.clone(),
            address,
            password,
        })
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, overlaying environment variables for secrets.
    pub fn load(config_path: &Path) -> Result<(Self, Secrets)> {
        dotenvy::dotenv().ok();

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        let secrets = Secrets::from_env();

        Ok((config, secrets))
    }
}
