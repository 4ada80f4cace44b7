use crate::classifier::RelevanceClassifier;
use crate::collector::{CollectionReport, Collector};
use crate::config::ClipperConfig;
use crate::dedup::Deduplicator;
use crate::delivery::{DeliveryOutcome, Mailer};
use crate::digest::DigestRenderer;
use crate::normalizer::EntryNormalizer;
use crate::sources::SourceRegistry;
use crate::traits::FeedFetcher;
use crate::types::Result;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing survived collection; no digest was rendered or delivered.
    NoNews,
    Delivered(DeliveryOutcome),
}

/// One clipping run: collect from every registered source, render, deliver.
pub struct ClippingPipeline<F: FeedFetcher> {
    config: ClipperConfig,
    registry: SourceRegistry,
    collector: Collector<F>,
}

impl<F: FeedFetcher> ClippingPipeline<F> {
    pub fn new(config: ClipperConfig, registry: SourceRegistry, fetcher: F) -> Self {
        let deduplicator = config
            .dedupe
            .then(|| Deduplicator::new(config.similarity_threshold));

        let collector = Collector::new(fetcher)
            .with_normalizer(EntryNormalizer::new(config.summary_max_chars))
            .with_deduplicator(deduplicator)
            .with_time_normalizer(config.time_normalizer())
            .with_per_source_limit(config.per_source_limit)
            .with_sort_order(config.sort_order);

        Self {
            config,
            registry,
            collector,
        }
    }

    pub fn with_classifier(mut self, classifier: RelevanceClassifier) -> Self {
        self.collector = self.collector.with_classifier(classifier);
        self
    }

    pub fn config(&self) -> &ClipperConfig {
        &self.config
    }

    pub async fn collect(&self) -> CollectionReport {
        info!("Collecting news from {} sources", self.registry.len());
        self.collector.collect_report(self.registry.sources()).await
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        let report = self.collect().await;
        let items = report.items;

        if items.is_empty() {
            info!("No news collected, skipping delivery");
            return Ok(RunOutcome::NoNews);
        }
        info!("Collected {} articles in total", items.len());

        let time = self.config.time_normalizer();
        let renderer = DigestRenderer::new(time);
        let generated_at = time.now();
        let html = renderer.render(&items, generated_at);
        let text = renderer.render_text(&items, generated_at);

        let outcome = Mailer::from_config(&self.config).deliver(&html, &text).await?;
        Ok(RunOutcome::Delivered(outcome))
    }
}
