/// Segment selection module
///
/// Picks a bounded number of non-overlapping highlight segments from a cue
/// list. Keyword matches are taken first (with surrounding context); any
/// shortfall is filled with evenly sized chunks of the uncovered transcript.

pub mod backfill;
pub mod candidates;
pub mod keywords;

pub use keywords::KeywordSet;

use crate::transcript::Cue;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Keyword recorded on segments produced by chronological backfill
pub const BACKFILL_KEYWORD: &str = "general";

/// Default number of neighbouring cues included on each side of a match
pub const DEFAULT_CONTEXT_WINDOW: usize = 5;

/// A highlight span built from one or more cues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start of the first cue, in seconds
    pub start: f64,
    /// End of the last cue, in seconds
    pub end: f64,
    /// Texts of the contained cues joined with single spaces
    pub text: String,
    /// Keyword that triggered the segment, or [`BACKFILL_KEYWORD`]
    pub keyword: String,
    /// Distinct keywords found in the triggering cue
    pub score: u32,
    /// Index of the first cue the segment was built from
    pub first_cue: usize,
    /// Index of the last cue the segment was built from
    pub last_cue: usize,
}

impl Segment {
    /// Build a segment over the given cue indices (in transcript order)
    pub(crate) fn from_cues(
        cues: &[Cue],
        indices: impl IntoIterator<Item = usize>,
        keyword: &str,
        score: u32,
    ) -> Option<Self> {
        let indices: Vec<usize> = indices.into_iter().collect();
        let first = *indices.first()?;
        let last = *indices.last()?;

        let text = indices
            .iter()
            .map(|&i| cues[i].text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Some(Self {
            start: cues[first].start,
            end: cues[last].end,
            text,
            keyword: keyword.to_string(),
            score,
            first_cue: first,
            last_cue: last,
        })
    }

    /// Segment length in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether this segment was added by backfill rather than a keyword match
    pub fn is_backfill(&self) -> bool {
        self.keyword == BACKFILL_KEYWORD && self.score == 0
    }

    /// Overlap with closed ranges, so touching endpoints count
    pub fn touches(&self, start: f64, end: f64) -> bool {
        !(self.end < start || self.start > end)
    }

    /// Overlap with open ranges, so touching endpoints do not count
    pub fn overlaps(&self, other: &Segment) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Selection parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionParams {
    /// Maximum number of segments to return
    pub target_count: usize,
    /// Cues included on each side of a triggering cue
    pub context_window: usize,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            target_count: 4,
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }
}

/// Keyword-driven segment selector with chronological backfill
#[derive(Debug, Clone)]
pub struct SegmentSelector {
    keywords: KeywordSet,
    params: SelectionParams,
}

impl SegmentSelector {
    pub fn new(keywords: KeywordSet, params: SelectionParams) -> Self {
        Self { keywords, params }
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn params(&self) -> SelectionParams {
        self.params
    }

    /// Select up to `target_count` non-overlapping segments, ordered by start time
    pub fn select(&self, cues: &[Cue]) -> Vec<Segment> {
        let target = self.params.target_count;
        if cues.is_empty() || target == 0 {
            return Vec::new();
        }

        let found = candidates::find_candidates(cues, &self.keywords, self.params.context_window);
        let found_count = found.len();
        let kept = candidates::resolve_overlaps(found);
        debug!(
            "Keyword phase: {} candidates, {} kept after overlap resolution",
            found_count,
            kept.len()
        );

        let mut selected = kept;
        if selected.len() < target {
            let needed = target - selected.len();
            let chunks = backfill::backfill(cues, &selected, needed);
            let chunk_count = chunks.len();
            let before = selected.len();
            accept_disjoint(&mut selected, chunks);
            debug!(
                "Backfill phase: {} needed, {} built, {} accepted",
                needed,
                chunk_count,
                selected.len() - before
            );
        }

        selected.sort_by(|a, b| a.start.total_cmp(&b.start));
        selected.truncate(target);
        selected
    }
}

/// Append each chunk that does not overlap anything already accepted.
///
/// Source cues may overlap in time, which would otherwise break the
/// ordering guarantee `segments[i].end <= segments[i + 1].start`.
fn accept_disjoint(accepted: &mut Vec<Segment>, chunks: Vec<Segment>) {
    for chunk in chunks {
        if accepted.iter().any(|s| s.overlaps(&chunk)) {
            debug!(
                "Dropping backfill chunk {:.2}-{:.2}: overlaps an accepted segment",
                chunk.start, chunk.end
            );
            continue;
        }
        accepted.push(chunk);
    }
}

/// Convenience wrapper around [`SegmentSelector`]
pub fn select<S: AsRef<str>>(
    cues: &[Cue],
    keywords: &[S],
    target_count: usize,
    context_window: usize,
) -> Vec<Segment> {
    SegmentSelector::new(
        KeywordSet::new(keywords),
        SelectionParams {
            target_count,
            context_window,
        },
    )
    .select(cues)
}
