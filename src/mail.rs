//! SMTP delivery of the report.
//!
//! The report goes from the configured account to itself over implicit
//! TLS on the submissions port.

use std::time::Duration;

use anyhow::{Context, Result};
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use tracing::{info, instrument, warn};

use crate::config::{MailConfig, MailSettings, Secrets};
use crate::error::DigestError;

/// Implicit-TLS SMTP submission port.
pub const SMTPS_PORT: u16 = 465;

pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    mailbox: Mailbox,
    subject: String,
}

impl Mailer {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let mailbox: Mailbox = config
            .address
            .parse()
            .with_context(|| format!("Invalid email address: {}", config.address))?;

        let credentials = Credentials::new(
            config.address.clone(),
            config.password.expose_secret().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .with_context(|| format!("Invalid SMTP relay: {}", config.smtp_host))?
            .port(SMTPS_PORT)
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(30)))
            .build();

        Ok(Self {
            transport,
            mailbox,
            subject: config.subject.clone(),
        })
    }

    /// Build the report message: HTML-only multipart/alternative, sent to self.
    pub fn build_message(&self, html: String) -> Result<Message> {
        Message::builder()
            .from(self.mailbox.clone())
            .to(self.mailbox.clone())
            .subject(self.subject.as_str())
            .multipart(MultiPart::alternative().singlepart(SinglePart::html(html)))
            .context("Failed to build report email")
    }

    #[instrument(skip(self, html), fields(to = %self.mailbox))]
    pub async fn send_report(&self, html: String) -> Result<(), DigestError> {
        let message = self
            .build_message(html)
            .map_err(|e| DigestError::network(&e))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| DigestError::Network(format!("SMTP send failed: {e}")))?;

        info!("Report email sent");
        Ok(())
    }
}

/// Validate mail credentials and send. Every failure is logged and
/// swallowed so the run always completes.
pub async fn deliver_report(settings: &MailSettings, secrets: &Secrets, html: String) -> bool {
    let config = match MailConfig::from_parts(settings, secrets) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Skipping report email");
            return false;
        }
    };

    let mailer = match Mailer::new(&config) {
        Ok(mailer) => mailer,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "Failed to set up SMTP transport");
            return false;
        }
    };

    match mailer.send_report(html).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Failed to send report email");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config() -> MailConfig {
        MailConfig {
            smtp_host: "smtp.example.com".to_string(),
            subject: "Daily Energy Market Report".to_string(),
            address: "desk@example.com".to_string(),
            password: SecretString::from("hunter2".to_string()),
        }
    }

    #[test]
    fn test_message_headers() {
        let mailer = Mailer::new(&config()).unwrap();
        let message = mailer.build_message("<p>hi</p>".to_string()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: Daily Energy Market Report"));
        assert!(raw.contains("From: desk@example.com"));
        assert!(raw.contains("To: desk@example.com"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn test_invalid_address_rejected() {
        let mut config = config();
        config.address = "not an address".to_string();
        assert!(Mailer::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_deliver_without_credentials_is_noop() {
        let settings = MailSettings {
            smtp_host: "smtp.example.com".to_string(),
            subject: "Report".to_string(),
        };
        let secrets = Secrets {
            news_api_key: None,
            email_address: None,
            email_password: None,
        };
        assert!(!deliver_report(&settings, &secrets, "<p/>".to_string()).await);
    }
}
