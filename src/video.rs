use crate::error::{HighlightError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use url::Url;

fn video_id_regex() -> &'static Regex {
    static VIDEO_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    VIDEO_ID_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{6,}$").expect("Failed to compile video id regex"))
}

/// Thumbnail sizes served by the YouTube image host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailQuality {
    MaxRes,
    High,
    Medium,
    Standard,
}

impl ThumbnailQuality {
    fn file_name(self) -> &'static str {
        match self {
            ThumbnailQuality::MaxRes => "maxresdefault.jpg",
            ThumbnailQuality::High => "hqdefault.jpg",
            ThumbnailQuality::Medium => "mqdefault.jpg",
            ThumbnailQuality::Standard => "sddefault.jpg",
        }
    }
}

/// A YouTube video identified by its id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoRef {
    pub id: String,
}

impl VideoRef {
    /// Extract the video id from a YouTube URL or accept a bare id
    ///
    /// Handles `watch?v=`, `youtu.be/`, `/embed/`, `/v/` and `/shorts/` links.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let invalid = || HighlightError::InvalidVideoUrl(input.to_string());

        if video_id_regex().is_match(input) && !input.contains('.') {
            return Ok(Self { id: input.to_string() });
        }

        let url = Url::parse(input).map_err(|_| invalid())?;
        let host = url.host_str().ok_or_else(invalid)?;
        let host = host.strip_prefix("www.").unwrap_or(host);
        let host = host.strip_prefix("m.").unwrap_or(host);

        let mut segments = url.path_segments().into_iter().flatten().filter(|s| !s.is_empty());
        let id = match host {
            "youtu.be" => segments.next().map(str::to_string),
            "youtube.com" | "youtube-nocookie.com" => match segments.next() {
                Some("watch") => url
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned()),
                Some("embed") | Some("v") | Some("shorts") | Some("live") => {
                    segments.next().map(str::to_string)
                }
                _ => None,
            },
            _ => None,
        };

        match id {
            Some(id) if video_id_regex().is_match(&id) => Ok(Self { id }),
            _ => Err(invalid()),
        }
    }

    /// Watch URL that starts playback at `seconds`
    pub fn seek_url(&self, seconds: f64) -> String {
        format!("https://www.youtube.com/watch?v={}&t={}s", self.id, whole_seconds(seconds))
    }

    /// Embeddable player URL that starts playback at `seconds`
    pub fn embed_url(&self, seconds: f64) -> String {
        format!("https://www.youtube.com/embed/{}?start={}", self.id, whole_seconds(seconds))
    }

    pub fn thumbnail_url(&self, quality: ThumbnailQuality) -> String {
        format!("https://img.youtube.com/vi/{}/{}", self.id, quality.file_name())
    }
}

impl fmt::Display for VideoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "https://www.youtube.com/watch?v={}", self.id)
    }
}

fn whole_seconds(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    }
}
