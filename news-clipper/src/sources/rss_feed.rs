use crate::traits::FeedFetcher;
use crate::types::{FeedSource, FetchConfig, RawEntry, Result};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use tracing::info;

/// Network-backed feed retrieval: HTTP fetch followed by feed parsing.
pub struct RssFeedFetcher {
    fetcher: Fetcher,
    parser: FeedParser,
}

impl RssFeedFetcher {
    pub fn new(fetch_config: FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(fetch_config)?,
            parser: FeedParser::new(),
        })
    }
}

#[async_trait]
impl FeedFetcher for RssFeedFetcher {
    async fn fetch_entries(&self, source: &FeedSource) -> Result<Vec<RawEntry>> {
        info!("Fetching from {}...", source.name);

        let content = self.fetcher.fetch_feed(&source.url).await?;
        let entries = self.parser.parse_feed(&content)?;

        info!("Pulled {} entries from {}", entries.len(), source.name);
        Ok(entries)
    }
}
