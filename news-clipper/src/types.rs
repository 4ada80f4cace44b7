use serde::{Deserialize, Serialize};

/// A named feed in the registry. Identity is the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// An entry as handed over by the feed collaborator, before any cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: String,
    pub link: String,
    pub published: Option<String>,
    pub summary: Option<String>,
}

/// Canonical news item. Title and summary are plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub source: String,
    pub title: String,
    pub link: String,
    /// Raw timestamp as published by the feed, empty when absent.
    pub published: String,
    pub summary: String,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "News-Clipper/1.0".to_string(),
            timeout_seconds: 30,
            max_retries: 2,
            retry_delay_seconds: 2,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

/// Coarse classification of failures, used to decide how a failure is contained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// One feed could not be fetched or parsed. The run continues without it.
    SourceFetch,
    /// Mail could not be built or sent. Recovered by the file fallback.
    Delivery,
    /// Missing or invalid settings.
    Configuration,
    /// Local filesystem or serialization failure.
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum ClipperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Feed parse error: {0}")]
    FeedParse(String),

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported feed URL scheme: {url}")]
    UnsupportedScheme { url: String },

    #[error("Email build error: {0}")]
    Email(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClipperError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClipperError::Http(_)
            | ClipperError::HttpStatus { .. }
            | ClipperError::FeedParse(_)
            | ClipperError::FeedTooLarge { .. }
            | ClipperError::InvalidUrl(_)
            | ClipperError::UnsupportedScheme { .. } => ErrorKind::SourceFetch,
            ClipperError::Email(_) | ClipperError::Address(_) | ClipperError::Smtp(_) => {
                ErrorKind::Delivery
            }
            ClipperError::Configuration(_) => ErrorKind::Configuration,
            ClipperError::Io(_) | ClipperError::Serialization(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClipperError>;
