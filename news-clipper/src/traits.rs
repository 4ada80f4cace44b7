use crate::types::{FeedSource, RawEntry, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Retrieves the entries of one feed.
///
/// Implementations report unreachable or malformed feeds as errors; the
/// collector contains them per source so one bad feed never ends the run.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch and parse the feed behind `source`, in feed order.
    async fn fetch_entries(&self, source: &FeedSource) -> Result<Vec<RawEntry>>;
}

#[async_trait]
impl<T: FeedFetcher + ?Sized> FeedFetcher for Arc<T> {
    async fn fetch_entries(&self, source: &FeedSource) -> Result<Vec<RawEntry>> {
        self.as_ref().fetch_entries(source).await
    }
}
