pub mod types;
pub mod traits;
pub mod fetcher;
pub mod parser;
pub mod sources;
pub mod normalizer;
pub mod classifier;
pub mod dedup;
pub mod time;
pub mod collector;
pub mod config;
pub mod digest;
pub mod delivery;
pub mod pipeline;

pub use types::*;
pub use traits::FeedFetcher;
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use sources::{RssFeedFetcher, SourceRegistry};
pub use normalizer::EntryNormalizer;
pub use classifier::RelevanceClassifier;
pub use dedup::Deduplicator;
pub use time::TimeNormalizer;
pub use collector::{CollectionReport, Collector, SourceOutcome, SourceStatus};
pub use config::{ClipperConfig, SmtpSettings, SortOrder};
pub use digest::DigestRenderer;
pub use delivery::{DeliveryOutcome, Mailer};
pub use pipeline::{ClippingPipeline, RunOutcome};
