use crate::fetcher::validate_feed_url;
use crate::types::{ClipperError, FeedSource, Result};

/// Ordered, immutable list of feeds to clip. Iteration order is processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegistry {
    sources: Vec<FeedSource>,
}

impl SourceRegistry {
    pub fn new(sources: Vec<FeedSource>) -> Result<Self> {
        for (i, source) in sources.iter().enumerate() {
            if source.name.trim().is_empty() {
                return Err(ClipperError::Configuration(format!(
                    "feed source #{} has an empty name",
                    i + 1
                )));
            }
            if sources[..i].iter().any(|s| s.name == source.name) {
                return Err(ClipperError::Configuration(format!(
                    "duplicate feed source name: {}",
                    source.name
                )));
            }
            validate_feed_url(&source.url)?;
        }
        Ok(Self { sources })
    }

    /// Political news feeds of the five major Korean broadcasters and wire services.
    pub fn korean_politics() -> Self {
        Self {
            sources: vec![
                FeedSource::new("연합뉴스", "https://www.yna.co.kr/rss/politics.xml"),
                FeedSource::new(
                    "SBS",
                    "https://news.sbs.co.kr/news/SectionRssFeed.do?sectionId=01&plink=RSSREADER",
                ),
                FeedSource::new("MBC", "https://imnews.imbc.com/rss/google_news/narrativeNews.rss"),
                FeedSource::new("JTBC", "https://fs.jtbc.co.kr//RSS/politics.xml"),
                FeedSource::new("KBS", "http://world.kbs.co.kr/rss/rss_news.htm?lang=k&id=po"),
            ],
        }
    }

    /// Build a registry from `NAME=URL` specs, as given on the command line.
    pub fn from_specs<S: AsRef<str>>(specs: &[S]) -> Result<Self> {
        let sources = specs
            .iter()
            .map(|spec| parse_source_spec(spec.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(sources)
    }

    pub fn sources(&self) -> &[FeedSource] {
        &self.sources
    }

    pub fn get(&self, name: &str) -> Option<&FeedSource> {
        self.sources.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::korean_politics()
    }
}

fn parse_source_spec(spec: &str) -> Result<FeedSource> {
    let (name, url) = spec.split_once('=').ok_or_else(|| {
        ClipperError::Configuration(format!("expected NAME=URL, got `{}`", spec))
    })?;
    Ok(FeedSource::new(name.trim(), url.trim()))
}
