/// Conversion of manually pasted transcripts into cues
///
/// YouTube's "Show transcript" panel copies as plain text, usually with a
/// `M:SS` stamp in front of each line. Text without any stamps is split into
/// sentences and timed at an average speaking rate.
use super::timestamp::format_vtt_timestamp;
use super::Cue;
use regex::Regex;
use std::sync::OnceLock;

/// Speaking rate used to time unstamped text (150 words per minute)
const WORDS_PER_SECOND: f64 = 2.5;
/// Shortest duration given to a sentence in unstamped text
const MIN_SENTENCE_SECONDS: f64 = 2.0;
/// Duration of the final cue, which has no successor to end at
const LAST_CUE_SECONDS: f64 = 5.0;

fn stamp_regex() -> &'static Regex {
    static STAMP_REGEX: OnceLock<Regex> = OnceLock::new();
    STAMP_REGEX.get_or_init(|| {
        Regex::new(r"\b(\d{1,3}):(\d{2})(?::(\d{2}))?\b").expect("Failed to compile stamp regex")
    })
}

fn sentence_regex() -> &'static Regex {
    static SENTENCE_REGEX: OnceLock<Regex> = OnceLock::new();
    SENTENCE_REGEX.get_or_init(|| Regex::new(r"[.!?]+").expect("Failed to compile sentence regex"))
}

/// Convert pasted transcript text into cues
pub fn convert_plain_text(raw: &str) -> Vec<Cue> {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let has_stamps = lines.iter().take(5).any(|l| stamp_regex().is_match(l));
    let starts = if has_stamps {
        stamped_segments(&lines)
    } else {
        sentence_segments(&lines)
    };

    let mut cues = Vec::with_capacity(starts.len());
    for (i, (start, text)) in starts.iter().enumerate() {
        let end = starts
            .get(i + 1)
            .map(|(next, _)| *next)
            .unwrap_or(start + LAST_CUE_SECONDS);
        cues.push(Cue::new(*start, end, text.clone()));
    }
    cues
}

/// Lines carrying a stamp open a new segment; unstamped lines continue it
fn stamped_segments(lines: &[&str]) -> Vec<(f64, String)> {
    let mut segments = Vec::new();
    let mut current: Option<(f64, Vec<String>)> = None;

    for line in lines {
        if let Some(caps) = stamp_regex().captures(line) {
            if let Some((time, text)) = current.take() {
                push_segment(&mut segments, time, &text);
            }

            let field = |i: usize| -> f64 {
                caps.get(i)
                    .and_then(|m| m.as_str().parse::<u32>().ok())
                    .map(f64::from)
                    .unwrap_or(0.0)
            };
            let time = if caps.get(3).is_some() {
                field(1) * 3600.0 + field(2) * 60.0 + field(3)
            } else {
                field(1) * 60.0 + field(2)
            };

            let rest = stamp_regex().replace_all(line, "").trim().to_string();
            let text = if rest.is_empty() { Vec::new() } else { vec![rest] };
            current = Some((time, text));
        } else if let Some((_, text)) = current.as_mut() {
            text.push(line.to_string());
        }
    }

    if let Some((time, text)) = current {
        push_segment(&mut segments, time, &text);
    }
    segments
}

fn push_segment(segments: &mut Vec<(f64, String)>, time: f64, text: &[String]) {
    let joined = text.join(" ");
    if !joined.trim().is_empty() {
        segments.push((time, joined.trim().to_string()));
    }
}

/// Split unstamped text into sentences laid end to end from zero
fn sentence_segments(lines: &[&str]) -> Vec<(f64, String)> {
    let full_text = lines.join(" ");
    let mut segments = Vec::new();
    let mut time = 0.0;

    for sentence in sentence_regex().split(&full_text) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        let words = sentence.split_whitespace().count() as f64;
        segments.push((time, sentence.to_string()));
        time += (words / WORDS_PER_SECOND).max(MIN_SENTENCE_SECONDS);
    }

    segments
}

/// Render cues as a WebVTT document
pub fn to_vtt(cues: &[Cue]) -> String {
    let mut vtt = String::from("WEBVTT\n\n");
    for cue in cues {
        vtt.push_str(&format!(
            "{} --> {}\n{}\n\n",
            format_vtt_timestamp(cue.start),
            format_vtt_timestamp(cue.end),
            cue.text
        ));
    }
    vtt
}
