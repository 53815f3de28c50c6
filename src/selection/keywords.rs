use crate::transcript::Cue;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Words ignored by keyword auto-detection
const STOP_WORDS: &[&str] = &[
    "that", "this", "with", "from", "have", "been", "were", "what", "when", "where", "which",
    "while", "would", "could", "should", "about", "after", "before", "because", "through",
    "there", "these", "those", "their", "them", "they", "your", "very", "just", "some",
];

/// Default number of keywords returned by auto-detection
pub const DEFAULT_DETECT_LIMIT: usize = 10;

fn word_regex() -> &'static Regex {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    WORD_REGEX.get_or_init(|| Regex::new(r"\b[a-z]{4,}\b").expect("Failed to compile word regex"))
}

/// Ordered, case-insensitive keyword list.
///
/// Keywords are trimmed and lowercased; empty entries and case-insensitive
/// duplicates are removed, keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        let mut normalized: Vec<String> = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !normalized.contains(&keyword) {
                normalized.push(keyword);
            }
        }
        Self { keywords: normalized }
    }

    /// Parse a comma separated keyword list such as `"intro, results"`
    pub fn parse_list(list: &str) -> Self {
        let parts: Vec<&str> = list.split(',').collect();
        Self::new(&parts)
    }

    /// Pick the most frequent meaningful words of a transcript.
    ///
    /// Words of four or more letters outside the stop-word list are ranked by
    /// count; ties keep first-occurrence order.
    pub fn detect(cues: &[Cue], limit: usize) -> Self {
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        let mut order = 0;

        for cue in cues {
            let text = cue.text.to_lowercase();
            for m in word_regex().find_iter(&text) {
                let word = m.as_str();
                if STOP_WORDS.contains(&word) {
                    continue;
                }
                let entry = counts.entry(word.to_string()).or_insert_with(|| {
                    order += 1;
                    (0, order)
                });
                entry.0 += 1;
            }
        }

        let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
        ranked.sort_by(|(_, (count_a, seen_a)), (_, (count_b, seen_b))| {
            count_b.cmp(count_a).then(seen_a.cmp(seen_b))
        });

        let words: Vec<String> = ranked.into_iter().take(limit).map(|(w, _)| w).collect();
        Self::new(&words)
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// First keyword, in configured order, contained in already-lowercased text
    pub fn first_match(&self, text_lower: &str) -> Option<&str> {
        self.iter().find(|k| text_lower.contains(k))
    }

    /// Number of distinct keywords contained in already-lowercased text
    pub fn score(&self, text_lower: &str) -> u32 {
        self.iter().filter(|k| text_lower.contains(k)).count() as u32
    }
}
