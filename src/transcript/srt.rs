use super::timestamp::parse_timestamp;
use super::{split_blocks, Cue};
use tracing::debug;

/// Parse SRT (SubRip) subtitles.
///
/// Each block is a sequence number, a `HH:MM:SS,mmm --> HH:MM:SS,mmm` line and
/// one or more text lines. Malformed blocks are skipped.
pub fn parse_srt(raw: &str) -> Vec<Cue> {
    let mut cues = Vec::new();

    for (block_no, block) in split_blocks(raw).into_iter().enumerate() {
        match parse_block(&block) {
            Some(cue) => cues.push(cue),
            None => debug!("Skipping malformed SRT block {}", block_no + 1),
        }
    }

    cues
}

fn parse_block(lines: &[&str]) -> Option<Cue> {
    // Some exporters drop the sequence number; accept a timing line first
    let (timing_line, text_lines) = match lines {
        [first, rest @ ..] if first.contains("-->") => (*first, rest),
        [_, timing, rest @ ..] => (*timing, rest),
        _ => return None,
    };

    let (start, end) = timing_line.split_once("-->")?;
    let start = parse_timestamp(start).ok()?;
    let end = parse_timestamp(end).ok()?;

    let text = clean_text(&text_lines.join(" "));
    if text.is_empty() {
        return None;
    }

    Some(Cue::new(start, end, text))
}

/// Collapse line breaks, tabs and repeated spaces into single spaces
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
