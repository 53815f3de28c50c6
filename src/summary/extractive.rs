use super::Summarizer;
use crate::error::Result;
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

/// Words that make a sentence more likely to be picked
const IMPORTANT_WORDS: &[&str] = &["important", "key", "main", "first", "finally", "conclusion"];

/// Spoken filler removed before sentence scoring
const FILLER_WORDS: &[&str] = &["um", "uh", "you know", "i mean", "basically", "actually"];

/// Text shorter than this is returned unchanged
const MIN_SUMMARY_INPUT: usize = 20;

/// Sentences this short or shorter are ignored
const MIN_SENTENCE_CHARS: usize = 10;

fn aside_regex() -> &'static Regex {
    static ASIDE_REGEX: OnceLock<Regex> = OnceLock::new();
    // [Music], [Applause], (laughs)
    ASIDE_REGEX.get_or_init(|| Regex::new(r"\[[^\]]*\]|\([^)]*\)").expect("Failed to compile aside regex"))
}

fn filler_regex() -> &'static Regex {
    static FILLER_REGEX: OnceLock<Regex> = OnceLock::new();
    FILLER_REGEX.get_or_init(|| {
        let pattern = format!(r"(?i)\b(?:{})\b,?", FILLER_WORDS.join("|"));
        Regex::new(&pattern).expect("Failed to compile filler regex")
    })
}

fn sentence_regex() -> &'static Regex {
    static SENTENCE_REGEX: OnceLock<Regex> = OnceLock::new();
    SENTENCE_REGEX.get_or_init(|| Regex::new(r"[.!?]+").expect("Failed to compile sentence regex"))
}

/// Sentence-picking summarizer that needs no model or network
#[derive(Debug, Clone)]
pub struct ExtractiveSummarizer {
    max_chars: usize,
}

impl ExtractiveSummarizer {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// Summarize synchronously
    pub fn summarize_text(&self, text: &str) -> String {
        let trimmed = text.trim();
        if trimmed.chars().count() < MIN_SUMMARY_INPUT {
            return trimmed.to_string();
        }

        let cleaned = clean_text(trimmed);
        let sentences: Vec<&str> = sentence_regex()
            .split(&cleaned)
            .map(str::trim)
            .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
            .collect();

        if sentences.is_empty() {
            return truncate(&cleaned, self.max_chars);
        }

        let last = sentences.len() - 1;
        let mut scored: Vec<(usize, u32)> = sentences
            .iter()
            .enumerate()
            .map(|(i, sentence)| {
                let lower = sentence.to_lowercase();
                let position = if i == 0 || i == last { 2 } else { 0 };
                let important = IMPORTANT_WORDS.iter().filter(|w| lower.contains(*w)).count() as u32;
                (i, position + important)
            })
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        let budget = self.max_chars;
        let mut picked = Vec::new();
        let mut total = 0;
        for (i, _) in scored {
            let len = sentences[i].chars().count();
            if total + len <= budget {
                picked.push(i);
                total += len;
            }
            if total as f64 >= budget as f64 * 0.8 {
                break;
            }
        }

        if picked.is_empty() {
            return truncate(sentences[0], self.max_chars);
        }

        picked.sort_unstable();
        let body = picked
            .iter()
            .map(|&i| sentences[i])
            .collect::<Vec<_>>()
            .join(". ");
        format!("{}.", body)
    }
}

impl Default for ExtractiveSummarizer {
    fn default() -> Self {
        Self::new(160)
    }
}

#[async_trait]
impl Summarizer for ExtractiveSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        Ok(self.summarize_text(text))
    }

    fn name(&self) -> &'static str {
        "extractive"
    }
}

/// Remove bracketed asides, filler words and repeated whitespace
pub fn clean_text(text: &str) -> String {
    let without_asides = aside_regex().replace_all(text, " ");
    let without_filler = filler_regex().replace_all(&without_asides, " ");
    without_filler.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head.trim_end())
    }
}
