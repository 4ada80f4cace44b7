//! Raw feed entry to canonical [`NewsItem`].

use crate::types::{NewsItem, RawEntry};
use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 150;
pub const ELLIPSIS: &str = "...";

/// Separator glyphs Korean outlets sprinkle through titles and leads.
const DECORATIVE_SYMBOLS: &[char] = &[
    '▲', '▼', '◆', '■', '□', '▶', '◀', '●', '○', '◇', '◈', '※', '★', '☆', '♠', '♣', '♥', '♦',
];

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<.*?>").expect("tag regex"));
// Entities the decoder does not know, or numeric ones naming no character.
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:[a-zA-Z][a-zA-Z0-9]*|#[0-9]+|#[xX][0-9a-fA-F]+);").expect("entity regex")
});
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static DOTS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{3,}").expect("dots regex"));
static DASHES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").expect("dashes regex"));

/// Reduce HTML-laden feed text to a single line of plain text.
///
/// Tags are removed, entities decoded (repeatedly, for double-encoded feeds),
/// anything that decoding turned back into markup is removed again, decorative
/// symbols are dropped and whitespace, dot and dash runs are collapsed.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut decoded = TAG_RE.replace_all(text, "").into_owned();
    loop {
        let next = html_escape::decode_html_entities(&decoded).into_owned();
        if next == decoded {
            break;
        }
        decoded = next;
    }

    let without_entities = ENTITY_RE.replace_all(&decoded, "");
    let without_markup: String = TAG_RE
        .replace_all(&without_entities, "")
        .chars()
        .filter(|c| *c != '<' && *c != '>' && !DECORATIVE_SYMBOLS.contains(c))
        .collect();

    let folded = WS_RE.replace_all(&without_markup, " ");
    let dots = DOTS_RE.replace_all(&folded, ELLIPSIS);
    let dashes = DASHES_RE.replace_all(&dots, "--");

    dashes.trim().to_string()
}

/// Cut `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}{}", &text[..byte_index], ELLIPSIS),
        None => text.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct EntryNormalizer {
    summary_max_chars: usize,
}

impl EntryNormalizer {
    pub fn new(summary_max_chars: usize) -> Self {
        Self { summary_max_chars }
    }

    /// Never fails: missing optional fields become empty strings.
    pub fn normalize(&self, source: &str, raw: &RawEntry) -> NewsItem {
        self.truncate_summary(self.normalize_untruncated(source, raw))
    }

    /// Like [`normalize`](Self::normalize) but keeps the whole cleaned summary,
    /// so keyword checks see text past the display cut.
    pub fn normalize_untruncated(&self, source: &str, raw: &RawEntry) -> NewsItem {
        NewsItem {
            source: source.to_string(),
            title: clean_text(&raw.title),
            link: raw.link.trim().to_string(),
            published: raw.published.clone().unwrap_or_default(),
            summary: raw.summary.as_deref().map(clean_text).unwrap_or_default(),
        }
    }

    pub fn truncate_summary(&self, mut item: NewsItem) -> NewsItem {
        item.summary = truncate_chars(&item.summary, self.summary_max_chars);
        item
    }
}

impl Default for EntryNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_SUMMARY_MAX_CHARS)
    }
}
