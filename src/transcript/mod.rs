/// Transcript parsing module
///
/// Turns timed-caption text (WebVTT, SRT, or a pasted plain transcript) into
/// an ordered list of cues. Parsing is tolerant: blocks that cannot be
/// interpreted are dropped and the rest of the transcript is kept.

pub mod convert;
pub mod srt;
pub mod timestamp;
pub mod vtt;

pub use convert::{convert_plain_text, to_vtt};
pub use timestamp::{format_timestamp, parse_timestamp};

use crate::error::{HighlightError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A single timestamped caption entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds, never before `start`
    pub end: f64,
    /// Caption text with markup stripped
    pub text: String,
}

impl Cue {
    /// Create a new cue, clamping `end` so it never precedes `start`
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end: end.max(start),
            text: text.into(),
        }
    }
}

/// Caption formats understood by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptFormat {
    Vtt,
    Srt,
    /// Pasted transcript, with or without `M:SS` stamps
    Text,
}

impl TranscriptFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                HighlightError::UnsupportedFormat(format!(
                    "{} has no file extension",
                    path.display()
                ))
            })?;
        ext.parse()
    }
}

impl FromStr for TranscriptFormat {
    type Err = HighlightError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vtt" | "webvtt" => Ok(Self::Vtt),
            "srt" => Ok(Self::Srt),
            "txt" | "text" => Ok(Self::Text),
            other => Err(HighlightError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for TranscriptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vtt => write!(f, "vtt"),
            Self::Srt => write!(f, "srt"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Parse raw transcript text in the given format
pub fn parse(raw: &str, format: TranscriptFormat) -> Vec<Cue> {
    match format {
        TranscriptFormat::Vtt => vtt::parse_vtt(raw),
        TranscriptFormat::Srt => srt::parse_srt(raw),
        TranscriptFormat::Text => convert_plain_text(raw),
    }
}

/// Read a transcript file and parse it, using the extension when no format is given
pub async fn load_transcript<P: AsRef<Path>>(
    path: P,
    format: Option<TranscriptFormat>,
) -> Result<Vec<Cue>> {
    let path = path.as_ref();
    let format = match format {
        Some(format) => format,
        None => TranscriptFormat::from_path(path)?,
    };

    let raw = tokio::fs::read_to_string(path).await?;
    let cues = parse(&raw, format);
    tracing::info!("📄 Parsed {} cues from {} ({})", cues.len(), path.display(), format);
    Ok(cues)
}

/// Split caption text into blocks separated by blank (or whitespace-only) lines
pub(crate) fn split_blocks(raw: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in raw.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_cue_end_is_clamped() {
        let cue = Cue::new(10.0, 5.0, "backwards");
        assert_eq!(cue.end, 10.0);
        assert_eq!(cue.start, 10.0);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            TranscriptFormat::from_path(&PathBuf::from("talk.en.vtt")).unwrap(),
            TranscriptFormat::Vtt
        );
        assert_eq!(
            TranscriptFormat::from_path(&PathBuf::from("talk.SRT")).unwrap(),
            TranscriptFormat::Srt
        );
        assert_eq!(
            TranscriptFormat::from_path(&PathBuf::from("notes.txt")).unwrap(),
            TranscriptFormat::Text
        );
        assert!(TranscriptFormat::from_path(&PathBuf::from("talk.docx")).is_err());
        assert!(TranscriptFormat::from_path(&PathBuf::from("talk")).is_err());
    }

    #[test]
    fn test_split_blocks_handles_whitespace_lines() {
        let raw = "a\nb\n   \nc\n\n\n\nd\n";
        let blocks = split_blocks(raw);
        assert_eq!(blocks, vec![vec!["a", "b"], vec!["c"], vec!["d"]]);
    }

    #[tokio::test]
    async fn test_load_transcript_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("captions.srt");
        tokio::fs::write(&path, "1\n00:00:01,000 --> 00:00:02,500\nHello there\n")
            .await
            .unwrap();

        let cues = load_transcript(&path, None).await.unwrap();
        assert_eq!(cues, vec![Cue::new(1.0, 2.5, "Hello there")]);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.vtt");

        let err = load_transcript(&path, None).await.unwrap_err();
        assert!(matches!(err, HighlightError::Io(_)));
    }
}
