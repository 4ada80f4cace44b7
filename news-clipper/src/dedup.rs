//! Near-duplicate removal by title similarity.

use crate::normalizer::clean_text;
use crate::types::NewsItem;
use tracing::debug;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Greedy, order-preserving deduplicator. An item is dropped when its title is
/// at least `threshold` similar to a title already kept.
#[derive(Debug, Clone)]
pub struct Deduplicator {
    threshold: f64,
}

impl Deduplicator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn dedupe(&self, items: Vec<NewsItem>) -> Vec<NewsItem> {
        let total = items.len();
        let mut kept: Vec<NewsItem> = Vec::with_capacity(total);
        let mut kept_keys: Vec<Vec<char>> = Vec::with_capacity(total);

        for item in items {
            let key = title_key(&item.title);
            if self.matches_any(&key, &kept_keys) {
                debug!("Dropping near-duplicate title: {}", item.title);
                continue;
            }
            kept_keys.push(key);
            kept.push(item);
        }

        if kept.len() < total {
            debug!("Removed {} near-duplicate items", total - kept.len());
        }
        kept
    }

    /// Whether `candidate` duplicates any of `accepted`.
    pub fn is_duplicate_of(&self, candidate: &NewsItem, accepted: &[NewsItem]) -> bool {
        let key = title_key(&candidate.title);
        accepted
            .iter()
            .any(|existing| similarity_ratio(&key, &title_key(&existing.title)) >= self.threshold)
    }

    fn matches_any(&self, key: &[char], kept_keys: &[Vec<char>]) -> bool {
        kept_keys
            .iter()
            .any(|existing| similarity_ratio(key, existing) >= self.threshold)
    }
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

/// Comparison key: cleaned, lowercased title keeping only letters and digits,
/// so spacing and punctuation differences do not count.
pub fn title_key(title: &str) -> Vec<char> {
    clean_text(title)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// `2 * LCS / (len(a) + len(b))`, in `[0, 1]`. Two empty keys are identical.
pub fn similarity_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * lcs_len(a, b)) as f64 / total as f64
}

pub fn title_similarity(a: &str, b: &str) -> f64 {
    similarity_ratio(&title_key(a), &title_key(b))
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for &x in long {
        for (j, &y) in short.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[short.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn item(source: &str, title: &str) -> NewsItem {
        NewsItem {
            source: source.to_string(),
            title: title.to_string(),
            link: format!("https://{}.example.kr/{}", source, title),
            published: String::new(),
            summary: String::new(),
        }
    }

    fn mixed_items() -> Vec<NewsItem> {
        vec![
            item("a", "국회 본회의 개최"),
            item("a", "국회 예산안 처리"),
            item("b", "국회본회의 개최 (속보)"),
            item("b", "검찰 수사 착수"),
            item("c", "[속보] 국회 예산안 처리"),
            item("c", "대통령실 인사 발표"),
            item("d", "검찰, 수사 착수!"),
        ]
    }

    #[test]
    fn lcs_of_known_pairs() {
        assert_eq!(lcs_len(&chars("ABCBDAB"), &chars("BDCABA")), 4);
        assert_eq!(lcs_len(&chars(""), &chars("abc")), 0);
        assert_eq!(lcs_len(&chars("국회본회의개최"), &chars("국회본회의개최속보")), 7);
    }

    #[test]
    fn ratio_bounds() {
        assert_eq!(similarity_ratio(&[], &[]), 1.0);
        assert_eq!(similarity_ratio(&chars("abc"), &chars("abc")), 1.0);
        assert_eq!(similarity_ratio(&chars("abc"), &chars("xyz")), 0.0);
    }

    #[test]
    fn spacing_and_punctuation_do_not_count() {
        assert_eq!(title_similarity("국회, 본회의 개최!", "국회 본회의개최"), 1.0);
        assert!(title_similarity("국회 본회의 개최", "국회본회의 개최 (속보)") >= 0.8);
        assert!(title_similarity("<b>여야</b> 예산안 합의", "여야 예산안 합의") >= 0.8);
    }

    #[test]
    fn unrelated_political_titles_are_not_duplicates() {
        assert!(title_similarity("국회 예산안 처리", "검찰 수사 착수") < DEFAULT_SIMILARITY_THRESHOLD);
        assert!(title_similarity("대통령실 인사 발표", "여야 원내대표 회동") < DEFAULT_SIMILARITY_THRESHOLD);

        let items = vec![item("a", "국회 예산안 처리"), item("b", "검찰 수사 착수")];
        assert_eq!(Deduplicator::default().dedupe(items.clone()), items);
    }

    #[test]
    fn dedupe_keeps_first_of_each_group_in_input_order() {
        let kept = Deduplicator::default().dedupe(mixed_items());
        let pairs: Vec<(&str, &str)> = kept
            .iter()
            .map(|i| (i.source.as_str(), i.title.as_str()))
            .collect();

        assert_eq!(
            pairs,
            [
                ("a", "국회 본회의 개최"),
                ("a", "국회 예산안 처리"),
                ("b", "검찰 수사 착수"),
                ("c", "대통령실 인사 발표"),
            ]
        );
    }

    #[test]
    fn dedupe_is_idempotent() {
        let dedup = Deduplicator::default();
        let once = dedup.dedupe(mixed_items());
        assert_eq!(once.len(), 4);
        assert_eq!(dedup.dedupe(once.clone()), once);
    }

    #[test]
    fn incremental_check_agrees_with_batch_dedupe() {
        let dedup = Deduplicator::default();
        let kept = dedup.dedupe(mixed_items());

        for candidate in mixed_items().iter().filter(|i| !kept.contains(i)) {
            assert!(dedup.is_duplicate_of(candidate, &kept), "{}", candidate.title);
        }
        for (i, survivor) in kept.iter().enumerate() {
            let others: Vec<NewsItem> = kept
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, k)| k.clone())
                .collect();
            assert!(!dedup.is_duplicate_of(survivor, &others), "{}", survivor.title);
        }
    }

    #[test]
    fn higher_threshold_keeps_more() {
        let strict = Deduplicator::new(0.95).dedupe(mixed_items());
        assert!(strict.iter().any(|i| i.title == "국회본회의 개최 (속보)"));
        assert_eq!(Deduplicator::new(0.95).threshold(), 0.95);
    }
}
