use crate::types::{ClipperError, RawEntry, Result};
use feed_rs::parser;
use std::collections::HashSet;
use tracing::debug;

/// Turns an RSS/Atom document into raw entries, in feed order.
#[derive(Debug, Default, Clone, Copy)]
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw feed document. The input is bytes so feed-rs can decode
    /// non-UTF-8 feeds (EUC-KR is common) from their XML declaration.
    pub fn parse_feed(&self, content: &[u8]) -> Result<Vec<RawEntry>> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content)
            .map_err(|e| ClipperError::FeedParse(format!("Failed to parse feed: {}", e)))?;

        let mut seen_links = HashSet::new();
        let mut entries = Vec::with_capacity(feed.entries.len());

        for entry in feed.entries {
            if let Some(raw) = Self::parse_entry(entry) {
                if !seen_links.insert(raw.link.clone()) {
                    debug!("Skipping repeated entry link: {}", raw.link);
                    continue;
                }
                entries.push(raw);
            }
        }

        debug!("Parsed feed with {} entries", entries.len());
        Ok(entries)
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> Option<RawEntry> {
        let link = entry.links.first()?.href.trim().to_string();
        if link.is_empty() {
            return None;
        }

        let title = entry.title.map(|t| t.content).unwrap_or_default();

        // RSS description lands in `summary`; Atom-only feeds may carry just `content`.
        let summary = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body));

        let published = entry
            .published
            .or(entry.updated)
            .map(|dt| dt.to_rfc3339());

        Some(RawEntry {
            title,
            link,
            published,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>정치 뉴스</title>
    <link>https://news.example.kr</link>
    <description>sample</description>
    <item>
      <title>국회 본회의 개최</title>
      <link>https://news.example.kr/1</link>
      <description><![CDATA[<p>여야가 <b>본회의</b>에서 법안을 처리했다.</p>]]></description>
      <pubDate>Mon, 19 Oct 2026 09:00:00 +0900</pubDate>
    </item>
    <item>
      <title>같은 링크의 재전송</title>
      <link>https://news.example.kr/1</link>
    </item>
    <item>
      <title>대통령실 브리핑</title>
      <link>https://news.example.kr/2</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_entries_in_feed_order_and_drops_repeated_links() {
        let entries = FeedParser::new().parse_feed(SAMPLE_RSS.as_bytes()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "국회 본회의 개최");
        assert_eq!(entries[0].link, "https://news.example.kr/1");
        assert!(entries[0].summary.as_deref().unwrap().contains("<b>본회의</b>"));
        assert_eq!(entries[0].published.as_deref(), Some("2026-10-19T00:00:00+00:00"));

        assert_eq!(entries[1].title, "대통령실 브리핑");
        assert_eq!(entries[1].published, None);
        assert_eq!(entries[1].summary, None);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = FeedParser::new().parse_feed(b"<html>not a feed").unwrap_err();
        assert!(matches!(err, ClipperError::FeedParse(_)));
    }

    #[test]
    fn decodes_feeds_declared_as_euc_kr() {
        let mut doc = br#"<?xml version="1.0" encoding="EUC-KR"?>
<rss version="2.0"><channel><title>t</title><link>https://news.example.kr</link><description>d</description>
<item><title>"#
            .to_vec();
        // "국회 본회의 개최" in EUC-KR
        doc.extend_from_slice(&[
            0xb1, 0xb9, 0xc8, 0xb8, b' ', 0xba, 0xbb, 0xc8, 0xb8, 0xc0, 0xc7, b' ', 0xb0, 0xb3, 0xc3, 0xd6,
        ]);
        doc.extend_from_slice(b"</title><link>https://news.example.kr/1</link></item></channel></rss>");

        let entries = FeedParser::new().parse_feed(&doc).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "국회 본회의 개최");
    }
}
