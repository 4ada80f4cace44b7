//! Run configuration, assembled once at startup and passed down.

use crate::collector::DEFAULT_PER_SOURCE_LIMIT;
use crate::dedup::DEFAULT_SIMILARITY_THRESHOLD;
use crate::normalizer::DEFAULT_SUMMARY_MAX_CHARS;
use crate::time::TimeNormalizer;
use crate::types::FetchConfig;
use chrono::FixedOffset;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_SMTP_TIMEOUT_SECONDS: u64 = 30;

pub const ENV_SMTP_SERVER: &str = "SMTP_SERVER";
pub const ENV_SMTP_PORT: &str = "SMTP_PORT";
pub const ENV_SENDER_EMAIL: &str = "SENDER_EMAIL";
pub const ENV_SENDER_PASSWORD: &str = "SENDER_PASSWORD";
pub const ENV_RECIPIENT_EMAIL: &str = "RECIPIENT_EMAIL";

/// Order of the final item list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SortOrder {
    /// Raw `published` strings, descending.
    #[default]
    Lexical,
    /// Parsed timestamps, newest first; unparseable last.
    Chronological,
}

#[derive(Clone)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub sender: Option<String>,
    pub password: Option<String>,
    pub timeout_seconds: u64,
}

// Hand-written so the password never reaches the logs.
impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("sender", &self.sender)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ClipperConfig {
    pub smtp: SmtpSettings,
    pub recipient: Option<String>,
    pub output_dir: PathBuf,
    pub per_source_limit: usize,
    pub summary_max_chars: usize,
    pub similarity_threshold: f64,
    pub dedupe: bool,
    pub sort_order: SortOrder,
    pub display_offset: FixedOffset,
    pub fetch: FetchConfig,
}

impl ClipperConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset and
    /// an unparsable port falls back to the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = get(ENV_SMTP_PORT)
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SMTP_PORT);

        Self {
            smtp: SmtpSettings {
                server: get(ENV_SMTP_SERVER).unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
                port,
                sender: get(ENV_SENDER_EMAIL),
                password: get(ENV_SENDER_PASSWORD),
                timeout_seconds: DEFAULT_SMTP_TIMEOUT_SECONDS,
            },
            recipient: get(ENV_RECIPIENT_EMAIL),
            output_dir: PathBuf::from("."),
            per_source_limit: DEFAULT_PER_SOURCE_LIMIT,
            summary_max_chars: DEFAULT_SUMMARY_MAX_CHARS,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            dedupe: true,
            sort_order: SortOrder::default(),
            display_offset: TimeNormalizer::default().offset(),
            fetch: FetchConfig::default(),
        }
    }

    /// Names of the delivery settings that are missing. Non-empty means the
    /// digest is written to a local file instead of being mailed.
    pub fn missing_delivery_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.smtp.sender.is_none() {
            missing.push(ENV_SENDER_EMAIL);
        }
        if self.smtp.password.is_none() {
            missing.push(ENV_SENDER_PASSWORD);
        }
        if self.recipient.is_none() {
            missing.push(ENV_RECIPIENT_EMAIL);
        }
        missing
    }

    pub fn local_mode(&self) -> bool {
        !self.missing_delivery_settings().is_empty()
    }

    pub fn time_normalizer(&self) -> TimeNormalizer {
        TimeNormalizer::new(self.display_offset)
    }
}

impl Default for ClipperConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = ClipperConfig::default();
        assert_eq!(config.smtp.server, DEFAULT_SMTP_SERVER);
        assert_eq!(config.smtp.port, DEFAULT_SMTP_PORT);
        assert_eq!(config.per_source_limit, 5);
        assert_eq!(config.summary_max_chars, 150);
        assert_eq!(config.sort_order, SortOrder::Lexical);
        assert_eq!(config.display_offset.local_minus_utc(), 9 * 3600);
        assert!(config.local_mode());
        assert_eq!(
            config.missing_delivery_settings(),
            [ENV_SENDER_EMAIL, ENV_SENDER_PASSWORD, ENV_RECIPIENT_EMAIL]
        );
    }

    #[test]
    fn reads_delivery_settings() {
        let config = ClipperConfig::from_lookup(lookup(&[
            (ENV_SMTP_SERVER, "smtp.example.kr"),
            (ENV_SMTP_PORT, "2525"),
            (ENV_SENDER_EMAIL, "clipper@example.kr"),
            (ENV_SENDER_PASSWORD, "app-password"),
            (ENV_RECIPIENT_EMAIL, "desk@example.kr"),
        ]));
        assert_eq!(config.smtp.server, "smtp.example.kr");
        assert_eq!(config.smtp.port, 2525);
        assert!(!config.local_mode());
        assert!(!format!("{:?}", config).contains("app-password"));
    }

    #[test]
    fn bad_port_and_blank_values_fall_back() {
        let config = ClipperConfig::from_lookup(lookup(&[
            (ENV_SMTP_PORT, "not-a-port"),
            (ENV_SENDER_EMAIL, "   "),
            (ENV_SENDER_PASSWORD, "pw"),
            (ENV_RECIPIENT_EMAIL, "desk@example.kr"),
        ]));
        assert_eq!(config.smtp.port, DEFAULT_SMTP_PORT);
        assert_eq!(config.smtp.sender, None);
        assert_eq!(config.missing_delivery_settings(), [ENV_SENDER_EMAIL]);
    }
}
