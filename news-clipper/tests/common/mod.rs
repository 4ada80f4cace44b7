#![allow(dead_code)]

use async_trait::async_trait;
use news_clipper::{ClipperError, FeedFetcher, FeedSource, RawEntry, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub enum StubFeed {
    Entries(Vec<RawEntry>),
    HttpStatus(u16),
    Malformed,
}

/// In-memory feed collaborator keyed by source name.
#[derive(Default)]
pub struct StubFetcher {
    feeds: HashMap<String, StubFeed>,
    calls: AtomicUsize,
    order: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(mut self, source: &str, entries: Vec<RawEntry>) -> Self {
        self.feeds.insert(source.to_string(), StubFeed::Entries(entries));
        self
    }

    pub fn with_status(mut self, source: &str, status: u16) -> Self {
        self.feeds.insert(source.to_string(), StubFeed::HttpStatus(status));
        self
    }

    pub fn with_malformed(mut self, source: &str) -> Self {
        self.feeds.insert(source.to_string(), StubFeed::Malformed);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fetch_order(&self) -> Vec<String> {
        self.order.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedFetcher for StubFetcher {
    async fn fetch_entries(&self, source: &FeedSource) -> Result<Vec<RawEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.order.lock().unwrap().push(source.name.clone());

        match self.feeds.get(&source.name) {
            Some(StubFeed::Entries(entries)) => Ok(entries.clone()),
            Some(StubFeed::HttpStatus(status)) => Err(ClipperError::HttpStatus {
                url: source.url.clone(),
                status: *status,
            }),
            Some(StubFeed::Malformed) => Err(ClipperError::FeedParse("unexpected root element".to_string())),
            None => Ok(Vec::new()),
        }
    }
}

pub fn entry(title: &str, published: &str) -> RawEntry {
    RawEntry {
        title: title.to_string(),
        link: format!("https://news.example.kr/{}", title),
        published: (!published.is_empty()).then(|| published.to_string()),
        summary: None,
    }
}

pub fn entry_with_summary(title: &str, summary: &str, published: &str) -> RawEntry {
    RawEntry {
        summary: Some(summary.to_string()),
        ..entry(title, published)
    }
}

pub fn source(name: &str) -> FeedSource {
    FeedSource::new(name, format!("https://{}.example.kr/rss.xml", name.to_lowercase()))
}
