use crate::alignment::edit::{edit_steps, group_steps};
use crate::types::{NormalizedText, WordOp};

/// Aligns two word sequences by minimum edit distance, comparing NORMALIZED
/// word text. Output blocks are contiguous, ordered, and fully cover both
/// sequences; either side being empty collapses to a single insert or delete
/// block over the other.
pub fn align_words(ref_words: &[NormalizedText], hyp_words: &[NormalizedText]) -> Vec<WordOp> {
    let steps = edit_steps(ref_words, hyp_words, |a, b| a.normalized == b.normalized);
    group_steps(&steps)
        .into_iter()
        .map(|(kind, ref_range, hyp_range)| WordOp {
            kind,
            ref_words: ref_words[ref_range.clone()]
                .iter()
                .map(|w| w.normalized.clone())
                .collect(),
            hyp_words: hyp_words[hyp_range.clone()]
                .iter()
                .map(|w| w.normalized.clone())
                .collect(),
            ref_range,
            hyp_range,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OpKind;

    fn words(list: &[&str]) -> Vec<NormalizedText> {
        list.iter()
            .map(|w| NormalizedText {
                original: w.to_string(),
                normalized: w.to_string(),
                offset_map: (0..w.chars().count()).collect(),
            })
            .collect()
    }

    fn kinds_and_ranges(ops: &[WordOp]) -> Vec<(OpKind, usize, usize, usize, usize)> {
        ops.iter()
            .map(|op| {
                (
                    op.kind,
                    op.ref_range.start,
                    op.ref_range.end,
                    op.hyp_range.start,
                    op.hyp_range.end,
                )
            })
            .collect()
    }

    #[test]
    fn identical_sequences_yield_one_equal_block() {
        let reference = words(&["مالك", "يوم", "الدين"]);
        let ops = align_words(&reference, &reference);
        assert_eq!(
            kinds_and_ranges(&ops),
            vec![(OpKind::Equal, 0, 3, 0, 3)]
        );
        assert_eq!(ops[0].ref_words, ops[0].hyp_words);
    }

    #[test]
    fn adjacent_replaces_stay_single_word_pairs() {
        let reference = words(&["مالك", "يوم", "الدين"]);
        let hypothesis = words(&["ما", "لليوم", "الدين"]);
        let ops = align_words(&reference, &hypothesis);
        assert_eq!(
            kinds_and_ranges(&ops),
            vec![
                (OpKind::Replace, 0, 1, 0, 1),
                (OpKind::Replace, 1, 2, 1, 2),
                (OpKind::Equal, 2, 3, 2, 3),
            ]
        );
    }

    #[test]
    fn empty_reference_is_one_insert_block() {
        let ops = align_words(&[], &words(&["a", "b"]));
        assert_eq!(kinds_and_ranges(&ops), vec![(OpKind::Insert, 0, 0, 0, 2)]);
        assert_eq!(ops[0].hyp_words, vec!["a", "b"]);
    }

    #[test]
    fn empty_hypothesis_is_one_delete_block() {
        let ops = align_words(&words(&["a", "b"]), &[]);
        assert_eq!(kinds_and_ranges(&ops), vec![(OpKind::Delete, 0, 2, 0, 0)]);
    }

    #[test]
    fn both_empty_yields_no_ops() {
        assert!(align_words(&[], &[]).is_empty());
    }

    #[test]
    fn missing_word_in_the_middle_is_a_delete_run() {
        let reference = words(&["a", "b", "c"]);
        let hypothesis = words(&["a", "c"]);
        let ops = align_words(&reference, &hypothesis);
        assert_eq!(
            kinds_and_ranges(&ops),
            vec![
                (OpKind::Equal, 0, 1, 0, 1),
                (OpKind::Delete, 1, 2, 1, 1),
                (OpKind::Equal, 2, 3, 1, 2),
            ]
        );
    }

    #[test]
    fn ops_partition_both_sequences() {
        let cases: Vec<(Vec<NormalizedText>, Vec<NormalizedText>)> = vec![
            (words(&["a", "b", "c", "d"]), words(&["a", "x", "d"])),
            (words(&["a"]), words(&["x", "y", "z"])),
            (words(&["q", "w", "e"]), words(&[])),
            (words(&["a", "b"]), words(&["b", "a"])),
        ];
        for (reference, hypothesis) in cases {
            let ops = align_words(&reference, &hypothesis);
            let ref_total: usize = ops.iter().map(|op| op.ref_range.len()).sum();
            let hyp_total: usize = ops.iter().map(|op| op.hyp_range.len()).sum();
            assert_eq!(ref_total, reference.len());
            assert_eq!(hyp_total, hypothesis.len());
            let mut next_ref = 0;
            let mut next_hyp = 0;
            for op in &ops {
                assert_eq!(op.ref_range.start, next_ref);
                assert_eq!(op.hyp_range.start, next_hyp);
                match op.kind {
                    OpKind::Insert => assert!(op.ref_range.is_empty() && !op.hyp_range.is_empty()),
                    OpKind::Delete => assert!(!op.ref_range.is_empty() && op.hyp_range.is_empty()),
                    _ => assert!(!op.ref_range.is_empty() && !op.hyp_range.is_empty()),
                }
                next_ref = op.ref_range.end;
                next_hyp = op.hyp_range.end;
            }
        }
    }

    #[test]
    fn equality_is_tested_on_normalized_text() {
        let reference = vec![NormalizedText {
            original: "بِسْمِ".to_string(),
            normalized: "بسم".to_string(),
            offset_map: vec![0, 2, 4],
        }];
        let hypothesis = vec![NormalizedText {
            original: "بسم".to_string(),
            normalized: "بسم".to_string(),
            offset_map: vec![0, 1, 2],
        }];
        let ops = align_words(&reference, &hypothesis);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].kind, OpKind::Equal);
    }
}
