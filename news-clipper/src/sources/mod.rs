pub mod registry;
pub mod rss_feed;

pub use registry::SourceRegistry;
pub use rss_feed::RssFeedFetcher;
