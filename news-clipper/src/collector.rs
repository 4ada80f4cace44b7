use crate::classifier::RelevanceClassifier;
use crate::config::SortOrder;
use crate::dedup::Deduplicator;
use crate::normalizer::EntryNormalizer;
use crate::time::TimeNormalizer;
use crate::traits::FeedFetcher;
use crate::types::{ClipperError, FeedSource, NewsItem, RawEntry};
use tracing::{debug, info, warn};

pub const DEFAULT_PER_SOURCE_LIMIT: usize = 5;

/// What happened to one source during a run.
#[derive(Debug)]
pub enum SourceStatus {
    Collected { scanned: usize, accepted: usize },
    Empty,
    Failed(ClipperError),
}

#[derive(Debug)]
pub struct SourceOutcome {
    pub source: String,
    pub status: SourceStatus,
}

#[derive(Debug, Default)]
pub struct CollectionReport {
    pub items: Vec<NewsItem>,
    pub outcomes: Vec<SourceOutcome>,
}

impl CollectionReport {
    pub fn failed_sources(&self) -> impl Iterator<Item = (&str, &ClipperError)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            SourceStatus::Failed(e) => Some((o.source.as_str(), e)),
            _ => None,
        })
    }
}

/// Pulls every source in order, keeps relevant items up to a per-source quota,
/// then merges, deduplicates and sorts them.
pub struct Collector<F: FeedFetcher> {
    fetcher: F,
    normalizer: EntryNormalizer,
    classifier: RelevanceClassifier,
    deduplicator: Option<Deduplicator>,
    time: TimeNormalizer,
    per_source_limit: usize,
    sort_order: SortOrder,
}

impl<F: FeedFetcher> Collector<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            normalizer: EntryNormalizer::default(),
            classifier: RelevanceClassifier::default(),
            deduplicator: Some(Deduplicator::default()),
            time: TimeNormalizer::default(),
            per_source_limit: DEFAULT_PER_SOURCE_LIMIT,
            sort_order: SortOrder::default(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: EntryNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_classifier(mut self, classifier: RelevanceClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// `None` turns off both the in-source and the cross-source duplicate checks.
    pub fn with_deduplicator(mut self, deduplicator: Option<Deduplicator>) -> Self {
        self.deduplicator = deduplicator;
        self
    }

    pub fn with_time_normalizer(mut self, time: TimeNormalizer) -> Self {
        self.time = time;
        self
    }

    pub fn with_per_source_limit(mut self, limit: usize) -> Self {
        self.per_source_limit = limit;
        self
    }

    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub async fn collect(&self, sources: &[FeedSource]) -> Vec<NewsItem> {
        self.collect_report(sources).await.items
    }

    pub async fn collect_report(&self, sources: &[FeedSource]) -> CollectionReport {
        let mut report = CollectionReport::default();

        for source in sources {
            let status = match self.fetcher.fetch_entries(source).await {
                Ok(entries) if entries.is_empty() => {
                    warn!("No entries found for {}", source.name);
                    SourceStatus::Empty
                }
                Ok(entries) => {
                    let (items, scanned) = self.select_from_source(source, &entries);
                    info!("Added {} articles from {}", items.len(), source.name);
                    let accepted = items.len();
                    report.items.extend(items);
                    SourceStatus::Collected { scanned, accepted }
                }
                Err(e) => {
                    warn!("Error fetching from {}: {}", source.name, e);
                    SourceStatus::Failed(e)
                }
            };
            report.outcomes.push(SourceOutcome {
                source: source.name.clone(),
                status,
            });
        }

        let mut items = std::mem::take(&mut report.items);
        if let Some(dedup) = &self.deduplicator {
            items = dedup.dedupe(items);
        }
        sort_items(&mut items, self.sort_order, &self.time);

        info!(
            "Collected {} articles from {} sources ({} failed)",
            items.len(),
            sources.len(),
            report.failed_sources().count()
        );
        report.items = items;
        report
    }

    /// Scan entries in feed order and stop as soon as the quota is filled.
    /// Returns the accepted items and how many entries were looked at.
    fn select_from_source(&self, source: &FeedSource, entries: &[RawEntry]) -> (Vec<NewsItem>, usize) {
        let mut accepted: Vec<NewsItem> = Vec::new();
        let mut scanned = 0;

        for raw in entries {
            if accepted.len() >= self.per_source_limit {
                break;
            }
            scanned += 1;

            // Keywords are matched against the full summary; it is cut only once accepted.
            let item = self.normalizer.normalize_untruncated(&source.name, raw);
            if !self.classifier.is_relevant(&item.title, &item.summary) {
                debug!("Not political, skipping: {}", item.title);
                continue;
            }
            if let Some(dedup) = &self.deduplicator {
                if dedup.is_duplicate_of(&item, &accepted) {
                    debug!("Near-duplicate within {}, skipping: {}", source.name, item.title);
                    continue;
                }
            }
            accepted.push(self.normalizer.truncate_summary(item));
        }

        (accepted, scanned)
    }
}

/// Newest first. `Lexical` compares the raw timestamp strings; `Chronological`
/// compares parsed instants and puts unparseable timestamps last. Ties keep
/// their collection order.
pub fn sort_items(items: &mut [NewsItem], order: SortOrder, time: &TimeNormalizer) {
    match order {
        SortOrder::Lexical => items.sort_by(|a, b| b.published.cmp(&a.published)),
        SortOrder::Chronological => {
            items.sort_by_cached_key(|item| std::cmp::Reverse(time.parse(&item.published)))
        }
    }
}
