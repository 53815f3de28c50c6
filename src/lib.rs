/// Highlight Cards
///
/// Turns a video transcript (WebVTT, SRT or plain text) into a small set of
/// highlight cards: keyword-driven segments with context, backfilled from the
/// rest of the transcript, each with a short summary and playback links.

pub mod cards;
pub mod config;
pub mod error;
pub mod selection;
pub mod summary;
pub mod transcript;
pub mod video;

// Re-export main types for easy access
pub use crate::cards::{CardDeck, HighlightCard, ThumbnailCache};
pub use crate::config::{Config, ConfigBuilder, RecentKeywords};
pub use crate::error::{HighlightError, Result};
pub use crate::selection::{select, KeywordSet, Segment, SegmentSelector, SelectionParams};
pub use crate::summary::{ExtractiveSummarizer, LLMConfig, LLMProvider, LlmSummarizer, Summarizer};
pub use crate::transcript::{load_transcript, parse, Cue, TranscriptFormat};
pub use crate::video::VideoRef;
