use super::{KeywordSet, Segment};
use crate::transcript::Cue;

/// Build one candidate per cue that contains a keyword.
///
/// A candidate spans `context_window` cues on each side of the triggering cue
/// (clipped to the transcript). Its score counts the distinct keywords in the
/// triggering cue only, not in the surrounding context.
pub fn find_candidates(cues: &[Cue], keywords: &KeywordSet, context_window: usize) -> Vec<Segment> {
    if keywords.is_empty() {
        return Vec::new();
    }

    let last = cues.len().saturating_sub(1);
    cues.iter()
        .enumerate()
        .filter_map(|(i, cue)| {
            let text = cue.text.to_lowercase();
            let keyword = keywords.first_match(&text)?;
            let from = i.saturating_sub(context_window);
            let to = i.saturating_add(context_window).min(last);
            Segment::from_cues(cues, from..=to, keyword, keywords.score(&text))
        })
        .collect()
}

/// Keep the best-scoring candidates that do not overlap each other.
///
/// Candidates are ordered by score, highest first; equal scores keep
/// transcript order. Ranges are compared inclusively, so candidates that
/// merely touch still conflict.
pub fn resolve_overlaps(mut candidates: Vec<Segment>) -> Vec<Segment> {
    // sort_by is stable
    candidates.sort_by(|a, b| b.score.cmp(&a.score));

    let mut kept: Vec<Segment> = Vec::new();
    for candidate in candidates {
        if kept.iter().any(|k| k.touches(candidate.start, candidate.end)) {
            continue;
        }
        kept.push(candidate);
    }
    kept
}
