use crate::types::{ClipperError, FetchConfig, Result};
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// HTTP side of feed retrieval: one shared client, retries with exponential backoff.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    /// Download the feed document at `url` and return its raw body. Bytes are
    /// left undecoded so the parser can honor the XML encoding declaration.
    pub async fn fetch_feed(&self, url: &str) -> Result<Vec<u8>> {
        validate_feed_url(url)?;

        let start_time = Instant::now();
        debug!("Fetching feed: {}", url);

        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds * 16),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(self.config.retry_delay_seconds * 30)),
            ..Default::default()
        };

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();

                    if !status.is_success() {
                        last_error = Some(ClipperError::HttpStatus {
                            url: url.to_string(),
                            status: status.as_u16(),
                        });
                    } else {
                        if let Some(content_length) = response.content_length() {
                            self.check_size(content_length as usize)?;
                        }

                        let content = response.bytes().await?.to_vec();
                        self.check_size(content.len())?;

                        info!(
                            "Fetched feed: {} ({} bytes, {}ms)",
                            url,
                            content.len(),
                            start_time.elapsed().as_millis()
                        );
                        return Ok(content);
                    }
                }
                Err(e) => {
                    last_error = Some(ClipperError::Http(e));
                }
            }

            if attempt < self.config.max_retries {
                if let Some(delay) = backoff.next_backoff() {
                    warn!("Attempt {} failed for {}, retrying in {:?}", attempt + 1, url, delay);
                    tokio::time::sleep(delay).await;
                    continue;
                }
            }
            break;
        }

        Err(last_error.unwrap_or_else(|| {
            ClipperError::FeedParse(format!("no response received from {}", url))
        }))
    }

    fn check_size(&self, bytes: usize) -> Result<()> {
        let size_mb = bytes / (1024 * 1024);
        if size_mb > self.config.max_feed_size_mb {
            return Err(ClipperError::FeedTooLarge { size_mb });
        }
        Ok(())
    }
}

/// Only absolute `http`/`https` URLs are fetched.
pub fn validate_feed_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(ClipperError::UnsupportedScheme {
            url: url.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;

    #[test]
    fn accepts_http_and_https_feeds() {
        assert!(validate_feed_url("https://www.yna.co.kr/rss/politics.xml").is_ok());
        assert!(validate_feed_url("http://world.kbs.co.kr/rss/rss_news.htm?lang=k&id=po").is_ok());
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        let err = validate_feed_url("ftp://example.com/feed.xml").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceFetch);
        assert!(matches!(err, ClipperError::UnsupportedScheme { .. }));

        let err = validate_feed_url("not a url").unwrap_err();
        assert!(matches!(err, ClipperError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn invalid_url_fails_without_network() {
        let fetcher = Fetcher::new(FetchConfig::default()).unwrap();
        let err = fetcher.fetch_feed("file:///etc/passwd").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceFetch);
    }
}
