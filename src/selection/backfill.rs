use super::{Segment, BACKFILL_KEYWORD};
use crate::transcript::Cue;
use tracing::debug;

/// Indices of cues whose time range touches none of the kept segments
pub fn unused_cues(cues: &[Cue], kept: &[Segment]) -> Vec<usize> {
    cues.iter()
        .enumerate()
        .filter(|(_, cue)| !kept.iter().any(|s| s.touches(cue.start, cue.end)))
        .map(|(i, _)| i)
        .collect()
}

/// Longest run of consecutive cue indices; the earliest wins a tie
fn largest_run(indices: &[usize]) -> &[usize] {
    let mut best: &[usize] = &[];
    let mut run_start = 0;
    for i in 1..=indices.len() {
        if i == indices.len() || indices[i] != indices[i - 1] + 1 {
            let run = &indices[run_start..i];
            if run.len() > best.len() {
                best = run;
            }
            run_start = i;
        }
    }
    best
}

/// Split the uncovered cues into `needed` chunks of equal size.
///
/// The last chunk absorbs the remainder. A chunk whose cues sit on both
/// sides of a kept segment is cut back to its longest consecutive run, so
/// chunks never span a kept segment. When there are fewer unused cues than
/// chunks requested, no chunks are produced.
pub fn backfill(cues: &[Cue], kept: &[Segment], needed: usize) -> Vec<Segment> {
    if needed == 0 {
        return Vec::new();
    }

    let unused = unused_cues(cues, kept);
    let chunk_size = unused.len() / needed;
    if chunk_size == 0 {
        return Vec::new();
    }

    (0..needed)
        .filter_map(|k| {
            let from = k * chunk_size;
            let to = if k + 1 == needed {
                unused.len()
            } else {
                from + chunk_size
            };
            let chunk = &unused[from..to];
            let run = largest_run(chunk);
            if run.len() < chunk.len() {
                debug!(
                    "Backfill chunk {} spans a kept segment, keeping cues {}..={}",
                    k + 1,
                    run[0],
                    run[run.len() - 1]
                );
            }
            Segment::from_cues(cues, run.iter().copied(), BACKFILL_KEYWORD, 0)
        })
        .collect()
}
