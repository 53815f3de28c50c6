/// Highlight card assembly and persistence
///
/// Cards pair a selected segment with its summary and playback links. A deck
/// is written as pretty JSON for the page renderer.

use crate::error::Result;
use crate::selection::Segment;
use crate::transcript::format_timestamp;
use crate::video::{ThumbnailQuality, VideoRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// One highlight card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightCard {
    /// 1-based position in the deck
    pub index: usize,
    pub start: f64,
    pub end: f64,
    /// Length in seconds
    pub duration: f64,
    /// `MM:SS` or `HH:MM:SS` rendering of `start`
    pub timestamp: String,
    pub keyword: String,
    pub score: u32,
    pub text: String,
    pub summary: String,
    pub seek_url: Option<String>,
    pub embed_url: Option<String>,
    pub thumbnail: Option<String>,
}

impl HighlightCard {
    pub fn from_segment(
        index: usize,
        segment: &Segment,
        summary: String,
        video: Option<&VideoRef>,
        thumbnails: &ThumbnailCache,
    ) -> Self {
        Self {
            index,
            start: segment.start,
            end: segment.end,
            duration: segment.duration(),
            timestamp: format_timestamp(segment.start),
            keyword: segment.keyword.clone(),
            score: segment.score,
            text: segment.text.clone(),
            summary,
            seek_url: video.map(|v| v.seek_url(segment.start)),
            embed_url: video.map(|v| v.embed_url(segment.start)),
            thumbnail: video.map(|v| thumbnails.thumbnail_for(v, segment.start)),
        }
    }
}

/// A titled set of cards for one video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDeck {
    pub title: String,
    pub video: Option<VideoRef>,
    pub generated_at: DateTime<Utc>,
    pub cards: Vec<HighlightCard>,
}

impl CardDeck {
    /// Build a deck from segments and their summaries (same order)
    pub fn build(
        title: impl Into<String>,
        video: Option<VideoRef>,
        segments: &[Segment],
        summaries: Vec<String>,
        thumbnails: &ThumbnailCache,
    ) -> Self {
        let cards = segments
            .iter()
            .zip(summaries)
            .enumerate()
            .map(|(i, (segment, summary))| {
                HighlightCard::from_segment(i + 1, segment, summary, video.as_ref(), thumbnails)
            })
            .collect();

        Self {
            title: title.into(),
            video,
            generated_at: Utc::now(),
            cards,
        }
    }

    pub async fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        info!("💾 Saved {} cards to: {}", self.cards.len(), path.display());
        Ok(())
    }

    pub async fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Per-run map from (video id, whole second) to an extracted frame.
///
/// Frames are produced by an external extractor. Positions without a frame
/// fall back to the video's hosted thumbnail.
#[derive(Debug, Clone, Default)]
pub struct ThumbnailCache {
    frames: HashMap<(String, u64), PathBuf>,
}

impl ThumbnailCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(video: &VideoRef, seconds: f64) -> (String, u64) {
        (video.id.clone(), seconds.max(0.0).floor() as u64)
    }

    pub fn insert(&mut self, video: &VideoRef, seconds: f64, path: PathBuf) -> Option<PathBuf> {
        self.frames.insert(Self::key(video, seconds), path)
    }

    pub fn get(&self, video: &VideoRef, seconds: f64) -> Option<&Path> {
        self.frames.get(&Self::key(video, seconds)).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Cached frame path, or the hosted thumbnail URL when none was extracted
    pub fn thumbnail_for(&self, video: &VideoRef, seconds: f64) -> String {
        match self.get(video, seconds) {
            Some(path) => path.display().to_string(),
            None => video.thumbnail_url(ThumbnailQuality::MaxRes),
        }
    }
}
