use crate::types::{CharOp, NormalizedText, OpKind};

/// Projects the non-equal character ops of a word pair onto ORIGINAL
/// hypothesis-word coordinates and merges them into minimal highlight
/// ranges: sorted, non-overlapping, zero-gap ranges coalesced.
pub fn extract_error_ranges(char_ops: &[CharOp], hyp: &NormalizedText) -> Vec<[usize; 2]> {
    let ranges = char_ops
        .iter()
        .filter(|op| matches!(op.kind, OpKind::Replace | OpKind::Insert))
        .filter(|op| op.hyp_span.1 > op.hyp_span.0)
        .map(|op| {
            let (start, end) = hyp.original_span(op.hyp_span);
            [start, end]
        })
        .collect();
    merge_ranges(ranges)
}

/// Merges overlapping and touching half-open intervals, ascending.
pub fn merge_ranges(mut ranges: Vec<[usize; 2]>) -> Vec<[usize; 2]> {
    if ranges.is_empty() {
        return ranges;
    }
    ranges.sort_by_key(|range| range[0]);
    let mut merged: Vec<[usize; 2]> = Vec::with_capacity(ranges.len());
    for [start, end] in ranges {
        match merged.last_mut() {
            Some(last) if start <= last[1] => last[1] = last[1].max(end),
            _ => merged.push([start, end]),
        }
    }
    merged
}

/// A word pair lost reference content entirely when the owning word op is a
/// delete, or when a single delete char op consumed the whole normalized
/// reference word against an empty hypothesis span.
pub fn has_missing(word_kind: OpKind, char_ops: &[CharOp], ref_norm_char_len: usize) -> bool {
    if word_kind == OpKind::Delete {
        return true;
    }
    ref_norm_char_len > 0
        && char_ops.iter().any(|op| {
            op.kind == OpKind::Delete
                && op.hyp_span.0 == op.hyp_span.1
                && op.ref_span == (0, ref_norm_char_len)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::char_align::align_word_pair;

    fn plain(text: &str) -> NormalizedText {
        NormalizedText {
            original: text.to_string(),
            normalized: text.to_string(),
            offset_map: (0..text.chars().count()).collect(),
        }
    }

    #[test]
    fn merge_joins_touching_and_overlapping_ranges() {
        assert_eq!(
            merge_ranges(vec![[3, 5], [0, 2], [2, 3], [7, 9]]),
            vec![[0, 5], [7, 9]]
        );
    }

    #[test]
    fn merge_of_empty_input_is_empty() {
        assert!(merge_ranges(Vec::new()).is_empty());
    }

    #[test]
    fn inserted_prefix_maps_to_one_leading_range() {
        let hyp = plain("لليوم");
        let char_ops = align_word_pair("يوم", &hyp.normalized);
        let ranges = extract_error_ranges(&char_ops, &hyp);
        assert_eq!(ranges, vec![[0, 2]]);
        assert!(!has_missing(OpKind::Replace, &char_ops, 3));
    }

    #[test]
    fn equal_pair_has_no_ranges() {
        let hyp = plain("يوم");
        let char_ops = align_word_pair("يوم", &hyp.normalized);
        assert!(extract_error_ranges(&char_ops, &hyp).is_empty());
    }

    #[test]
    fn ranges_are_reported_in_original_coordinates() {
        // Hypothesis word carries a haraka the reference lacks; the replaced
        // base letter's range must cover the deleted mark behind it.
        let hyp = NormalizedText {
            original: "يَزم".to_string(),
            normalized: "يزم".to_string(),
            offset_map: vec![0, 2, 3],
        };
        let char_ops = align_word_pair("يوم", &hyp.normalized);
        let ranges = extract_error_ranges(&char_ops, &hyp);
        assert_eq!(ranges, vec![[2, 3]]);
        // Round-trip: the flagged original slice re-normalizes to the
        // normalized slice at the offset-mapped indices.
        assert_eq!(hyp.slice_original(2, 3), "ز");
        assert_eq!(hyp.slice_normalized(1, 2), "ز");
    }

    #[test]
    fn whole_word_delete_sets_has_missing() {
        let char_ops = align_word_pair("يوم", "");
        assert!(has_missing(OpKind::Replace, &char_ops, 3));
    }

    #[test]
    fn partial_delete_does_not_set_has_missing() {
        // "مالك" vs "ملك": one inner letter deleted, the rest survives.
        let char_ops = align_word_pair("مالك", "ملك");
        assert!(!has_missing(OpKind::Replace, &char_ops, 4));
    }

    #[test]
    fn delete_word_op_always_has_missing() {
        assert!(has_missing(OpKind::Delete, &[], 3));
    }

    #[test]
    fn adjacent_error_spans_coalesce() {
        // "ابجد" vs "اxyد": two adjacent replaced letters become one range.
        let hyp = plain("اxyد");
        let char_ops = align_word_pair("ابجد", &hyp.normalized);
        let ranges = extract_error_ranges(&char_ops, &hyp);
        assert_eq!(ranges, vec![[1, 3]]);
    }
}
