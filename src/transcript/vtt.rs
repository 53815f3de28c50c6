use super::timestamp::parse_timestamp;
use super::{split_blocks, Cue};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

fn markup_regex() -> &'static Regex {
    static MARKUP_REGEX: OnceLock<Regex> = OnceLock::new();
    // Matches inline word timings (<00:00:01.000>) as well as <c>, </c>, <v Name> etc.
    MARKUP_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("Failed to compile markup regex"))
}

/// Parse WebVTT captions, including YouTube auto-caption output.
///
/// Blocks without a timing line or without text are skipped; a timing line
/// that fails to parse drops its block only.
pub fn parse_vtt(raw: &str) -> Vec<Cue> {
    let mut cues = Vec::new();

    for block in split_blocks(raw) {
        let mut timing: Option<(&str, &str)> = None;
        let mut text_lines: Vec<String> = Vec::new();

        for line in block {
            let line = line.trim();

            if line.contains("-->") {
                if timing.is_none() {
                    timing = split_timing_line(line);
                }
                continue;
            }

            // Anything before the timing line is a cue identifier or file header
            if timing.is_none() || is_header_line(line) {
                continue;
            }

            let cleaned = clean_caption_line(line);
            if !cleaned.is_empty() && !text_lines.contains(&cleaned) {
                text_lines.push(cleaned);
            }
        }

        let Some((start, end)) = timing else {
            continue;
        };
        if text_lines.is_empty() {
            continue;
        }

        match (parse_timestamp(start), parse_timestamp(end)) {
            (Ok(start), Ok(end)) => cues.push(Cue::new(start, end, text_lines.join(" "))),
            (Err(e), _) | (_, Err(e)) => debug!("Skipping VTT cue: {}", e),
        }
    }

    cues
}

/// Split `start --> end [settings]` into its two timestamps, dropping
/// layout settings such as `align:start position:0%`
fn split_timing_line(line: &str) -> Option<(&str, &str)> {
    let (start, rest) = line.split_once("-->")?;
    let end = rest.split_whitespace().next()?;
    Some((start.trim(), end))
}

fn is_header_line(line: &str) -> bool {
    line.starts_with("WEBVTT")
        || line.starts_with("Kind:")
        || line.starts_with("Language:")
        || (!line.is_empty() && line.chars().all(|c| c.is_ascii_digit()))
}

/// Strip markup and decode the handful of entities caption engines emit
fn clean_caption_line(line: &str) -> String {
    let stripped = markup_regex().replace_all(line, "");
    stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "WEBVTT\nKind: captions\nLanguage: en\n\n\
        1\n00:00:01.000 --> 00:00:04.000\nWelcome to the introduction\n\n\
        intro-2\n00:00:04.000 --> 00:00:07.500\nToday we cover results\n\n\
        00:00:07.500 --> 00:00:10.000\nAnd the conclusion\n";

    #[test]
    fn test_well_formed_cues_in_order() {
        let cues = parse_vtt(SAMPLE);
        assert_eq!(cues.len(), 3);
        assert_eq!(cues[0], Cue::new(1.0, 4.0, "Welcome to the introduction"));
        assert_eq!(cues[1], Cue::new(4.0, 7.5, "Today we cover results"));
        assert_eq!(cues[2], Cue::new(7.5, 10.0, "And the conclusion"));
    }

    #[test]
    fn test_malformed_block_is_skipped() {
        let raw = "WEBVTT\n\n\
            00:00:01.000 --> 00:00:02.000\nfirst\n\n\
            00:00:02.000 00:00:03.000\nno arrow here\n\n\
            00:00:03.000 --> 00:00:04.000\nthird\n";
        let cues = parse_vtt(raw);
        let texts: Vec<&str> = cues.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "third"]);
    }

    #[test]
    fn test_bad_timestamp_drops_only_that_block() {
        let raw = "WEBVTT\n\n\
            00:00:01.000 --> 00:00:02.000\nfine\n\n\
            00:xx:02.000 --> 00:00:03.000\nbroken\n\n\
            00:00:03.000 --> 00:00:04.000\nalso fine\n";
        assert_eq!(parse_vtt(raw).len(), 2);
    }

    #[test]
    fn test_youtube_auto_caption_cleanup() {
        let raw = "WEBVTT\nKind: captions\nLanguage: en\n\n\
            00:00:00.160 --> 00:00:02.869 align:start position:0%\n\
            so<00:00:00.480><c> today</c><00:00:00.799><c> we</c>\n\
            so today we\n\n\
            00:00:02.869 --> 00:00:02.879 align:start position:0%\n \n";
        let cues = parse_vtt(raw);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start, 0.16);
        assert_eq!(cues[0].end, 2.869);
        assert_eq!(cues[0].text, "so today we");
    }

    #[test]
    fn test_hourless_timestamps_and_entities() {
        let raw = "WEBVTT\n\n01:05.000 --> 01:09.250\n<v Host>Tom &amp; Jerry</v>\n";
        let cues = parse_vtt(raw);
        assert_eq!(cues, vec![Cue::new(65.0, 69.25, "Tom & Jerry")]);
    }

    #[test]
    fn test_empty_and_header_only_input() {
        assert!(parse_vtt("").is_empty());
        assert!(parse_vtt("WEBVTT\nKind: captions\n").is_empty());
    }
}
