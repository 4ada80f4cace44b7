use anyhow::Context;
use clap::{Parser, ValueEnum};
use news_clipper::collector::DEFAULT_PER_SOURCE_LIMIT;
use news_clipper::dedup::DEFAULT_SIMILARITY_THRESHOLD;
use news_clipper::time::KST_OFFSET_HOURS;
use news_clipper::{
    ClipperConfig, ClippingPipeline, DeliveryOutcome, DigestRenderer, RssFeedFetcher, RunOutcome,
    SortOrder, SourceRegistry, TimeNormalizer,
};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Html,
    Json,
}

/// Collects political news from Korean RSS feeds and mails an HTML digest.
#[derive(Debug, Parser)]
#[command(name = "news-clipper", version)]
struct Cli {
    /// Directory for the fallback `news_clip_<YYYYMMDD>.html` file
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Maximum number of articles taken from each source
    #[arg(long, default_value_t = DEFAULT_PER_SOURCE_LIMIT)]
    per_source_limit: usize,

    /// Title similarity at or above which two articles count as duplicates
    #[arg(long, default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
    similarity_threshold: f64,

    /// Keep near-duplicate titles
    #[arg(long)]
    no_dedupe: bool,

    /// Newest-first ordering: raw timestamp text or parsed instants
    #[arg(long, value_enum, default_value_t = SortOrder::Lexical)]
    sort: SortOrder,

    /// Display time zone as an offset from UTC
    #[arg(long, default_value_t = KST_OFFSET_HOURS, allow_negative_numbers = true)]
    utc_offset_hours: i32,

    /// Replace the built-in feeds (repeatable)
    #[arg(long = "source", value_name = "NAME=URL")]
    sources: Vec<String>,

    /// Collect and print the digest instead of delivering it
    #[arg(long)]
    dry_run: bool,

    /// Output format for --dry-run
    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    format: OutputFormat,

    /// Per-request timeout for feed downloads
    #[arg(long, default_value_t = 30)]
    timeout_seconds: u64,

    /// Retries per feed after a failed download
    #[arg(long, default_value_t = 2)]
    max_retries: u32,
}

impl Cli {
    fn to_config(&self) -> anyhow::Result<ClipperConfig> {
        let time = TimeNormalizer::from_offset_hours(self.utc_offset_hours)
            .with_context(|| format!("invalid UTC offset: {} hours", self.utc_offset_hours))?;
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            anyhow::bail!("similarity threshold must be within 0..=1");
        }

        let mut config = ClipperConfig::from_env();
        config.output_dir = self.output_dir.clone();
        config.per_source_limit = self.per_source_limit;
        config.similarity_threshold = self.similarity_threshold;
        config.dedupe = !self.no_dedupe;
        config.sort_order = self.sort;
        config.display_offset = time.offset();
        config.fetch.timeout_seconds = self.timeout_seconds;
        config.fetch.max_retries = self.max_retries;
        Ok(config)
    }

    fn registry(&self) -> anyhow::Result<SourceRegistry> {
        if self.sources.is_empty() {
            return Ok(SourceRegistry::korean_politics());
        }
        SourceRegistry::from_specs(&self.sources).context("invalid --source")
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    // Failures end the run quietly; a scheduler should never see a crash.
    if let Err(e) = run(cli).await {
        error!("News clipping aborted: {:#}", e);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.to_config()?;
    let registry = cli.registry()?;
    let fetcher = RssFeedFetcher::new(config.fetch.clone()).context("failed to build HTTP client")?;

    if config.local_mode() && !cli.dry_run {
        info!(
            "Missing {}, the digest will be saved under {}",
            config.missing_delivery_settings().join(", "),
            config.output_dir.display()
        );
    }

    let pipeline = ClippingPipeline::new(config, registry, fetcher);

    if cli.dry_run {
        let items = pipeline.collect().await.items;
        let output = match cli.format {
            OutputFormat::Json => serde_json::to_string_pretty(&items)?,
            OutputFormat::Html => {
                let time = pipeline.config().time_normalizer();
                DigestRenderer::new(time).render(&items, time.now())
            }
        };
        println!("{}", output);
        return Ok(());
    }

    match pipeline.run().await? {
        RunOutcome::NoNews => info!("No news collected today"),
        RunOutcome::Delivered(DeliveryOutcome::Sent { recipient }) => {
            info!("Digest mailed to {}", recipient)
        }
        RunOutcome::Delivered(DeliveryOutcome::SavedToFile { path }) => {
            info!("Digest saved to {}", path.display())
        }
    }
    Ok(())
}
