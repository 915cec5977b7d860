use std::ops::Range;

use crate::types::{OpKind, WordOp};

/// Maps each verse's reference-word range onto a hypothesis-word range using
/// the equal/replace blocks of a chapter-level alignment.
///
/// Blocks emitted by the aligner are 1:1 in width, so an overlap with a verse
/// boundary projects exactly into hypothesis coordinates; a block of unequal
/// widths (from an external op producer) contributes its whole hypothesis
/// range. A verse that overlaps no matched block falls back to proportional
/// distribution over the hypothesis.
pub fn split_hypothesis(
    word_ops: &[WordOp],
    verse_bounds: &[Range<usize>],
    ref_word_count: usize,
    hyp_word_count: usize,
) -> Vec<Range<usize>> {
    let matches: Vec<(&Range<usize>, &Range<usize>)> = word_ops
        .iter()
        .filter(|op| matches!(op.kind, OpKind::Equal | OpKind::Replace))
        .map(|op| (&op.ref_range, &op.hyp_range))
        .collect();

    verse_bounds
        .iter()
        .map(|bounds| {
            let mut start: Option<usize> = None;
            let mut end = 0usize;
            for (ref_range, hyp_range) in &matches {
                let overlap_start = ref_range.start.max(bounds.start);
                let overlap_end = ref_range.end.min(bounds.end);
                if overlap_start >= overlap_end {
                    continue;
                }
                let (hyp_start, hyp_end) = if ref_range.len() == hyp_range.len() {
                    (
                        hyp_range.start + (overlap_start - ref_range.start),
                        hyp_range.start + (overlap_end - ref_range.start),
                    )
                } else {
                    (hyp_range.start, hyp_range.end)
                };
                if start.is_none() {
                    start = Some(hyp_start);
                }
                end = end.max(hyp_end);
            }
            match start {
                Some(start) => start..end.max(start).min(hyp_word_count),
                None => proportional(bounds, ref_word_count, hyp_word_count),
            }
        })
        .collect()
}

fn proportional(bounds: &Range<usize>, ref_word_count: usize, hyp_word_count: usize) -> Range<usize> {
    if ref_word_count == 0 {
        return 0..0;
    }
    let start = bounds.start * hyp_word_count / ref_word_count;
    let end = bounds.end * hyp_word_count / ref_word_count;
    start..end.max(start)
}
