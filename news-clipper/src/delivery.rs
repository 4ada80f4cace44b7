//! Mail delivery with a local file fallback.

use crate::config::{ClipperConfig, SmtpSettings};
use crate::digest::DIGEST_TITLE;
use crate::time::{TimeNormalizer, KST_OFFSET_HOURS};
use crate::types::{ClipperError, Result};
use chrono::{Local, NaiveDate};
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent { recipient: String },
    SavedToFile { path: PathBuf },
}

/// `news_clip_<YYYYMMDD>.html`
pub fn fallback_file_name(date: NaiveDate) -> String {
    format!("news_clip_{}.html", date.format("%Y%m%d"))
}

pub struct Mailer {
    smtp: SmtpSettings,
    recipient: Option<String>,
    output_dir: PathBuf,
    time: TimeNormalizer,
}

impl Mailer {
    pub fn from_config(config: &ClipperConfig) -> Self {
        Self {
            smtp: config.smtp.clone(),
            recipient: config.recipient.clone(),
            output_dir: config.output_dir.clone(),
            time: config.time_normalizer(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Mail the digest, or write it to the output directory when settings are
    /// missing or sending fails. Only a failed file write is an error.
    pub async fn deliver(&self, html: &str, text: &str) -> Result<DeliveryOutcome> {
        let (sender, password, recipient) = match (
            self.smtp.sender.as_deref(),
            self.smtp.password.as_deref(),
            self.recipient.as_deref(),
        ) {
            (Some(sender), Some(password), Some(recipient)) => (sender, password, recipient),
            _ => {
                info!("Mail settings incomplete, running in local mode");
                return self.save_to_file(html).await;
            }
        };

        match self.send(sender, password, recipient, html, text).await {
            Ok(()) => {
                info!(to = %recipient, "Email sent successfully");
                Ok(DeliveryOutcome::Sent {
                    recipient: recipient.to_string(),
                })
            }
            Err(e) => {
                error!(kind = ?e.kind(), "Email delivery failed: {}", e);
                warn!("Saving the digest to a file instead");
                self.save_to_file(html).await
            }
        }
    }

    async fn send(
        &self,
        sender: &str,
        password: &str,
        recipient: &str,
        html: &str,
        text: &str,
    ) -> Result<()> {
        let from: Mailbox = sender.parse()?;
        let to: Mailbox = recipient.parse()?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject())
            .message_id(Some(message_id()))
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html.to_string()),
                    ),
            )?;

        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.smtp.server)?
                .port(self.smtp.port)
                .credentials(Credentials::new(sender.to_string(), password.to_string()))
                .timeout(Some(Duration::from_secs(self.smtp.timeout_seconds)))
                .build();

        mailer.send(email).await?;
        Ok(())
    }

    /// Subject carries both the host's local time and the display-zone time.
    pub fn subject(&self) -> String {
        let zone = if self.time.offset().local_minus_utc() == KST_OFFSET_HOURS * 3600 {
            "KST".to_string()
        } else {
            self.time.now().format("UTC%:z").to_string()
        };
        format!(
            "{} - 실행시각: {} | {}: {}",
            DIGEST_TITLE,
            Local::now().format("%Y.%m.%d %H:%M"),
            zone,
            self.time.now().format("%Y.%m.%d %H:%M"),
        )
    }

    pub async fn save_to_file(&self, html: &str) -> Result<DeliveryOutcome> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self
            .output_dir
            .join(fallback_file_name(Local::now().date_naive()));

        tokio::fs::write(&path, html).await.map_err(|e| {
            error!("Failed to write digest to {}: {}", path.display(), e);
            ClipperError::Io(e)
        })?;

        info!("Saved news clipping to {}", path.display());
        Ok(DeliveryOutcome::SavedToFile { path })
    }
}

fn message_id() -> String {
    format!("<news-{}@korean-news-clipper>", Local::now().format("%Y%m%d-%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_name_uses_compact_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(fallback_file_name(date), "news_clip_20261019.html");
    }

    #[test]
    fn message_id_is_bracketed() {
        let id = message_id();
        assert!(id.starts_with("<news-"));
        assert!(id.ends_with("@korean-news-clipper>"));
    }

    #[test]
    fn subject_names_the_zone() {
        let mailer = Mailer::from_config(&ClipperConfig::default());
        let subject = mailer.subject();
        assert!(subject.starts_with(DIGEST_TITLE));
        assert!(subject.contains("| KST: "));

        let mut config = ClipperConfig::default();
        config.display_offset = chrono::FixedOffset::west_opt(5 * 3600).unwrap();
        assert!(Mailer::from_config(&config).subject().contains("| UTC-05:00: "));
    }
}
