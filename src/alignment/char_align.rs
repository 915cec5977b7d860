use crate::alignment::edit::{edit_steps, group_steps};
use crate::types::{CharOp, OpKind};

/// Character-level alignment of one word pair, over NORMALIZED forms.
///
/// Identical inputs take the fast path: a single whole-word equal op with no
/// DP work (and no op at all for two empty words). Spans are half-open in
/// normalized-character coordinates.
pub fn align_word_pair(ref_norm: &str, hyp_norm: &str) -> Vec<CharOp> {
    let ref_chars: Vec<char> = ref_norm.chars().collect();
    let hyp_chars: Vec<char> = hyp_norm.chars().collect();

    if ref_chars == hyp_chars {
        if ref_chars.is_empty() {
            return Vec::new();
        }
        return vec![CharOp {
            kind: OpKind::Equal,
            ref_span: (0, ref_chars.len()),
            hyp_span: (0, hyp_chars.len()),
            ref_text: ref_norm.to_string(),
            hyp_text: hyp_norm.to_string(),
        }];
    }

    let steps = edit_steps(&ref_chars, &hyp_chars, |a, b| a == b);
    group_steps(&steps)
        .into_iter()
        .map(|(kind, ref_range, hyp_range)| CharOp {
            kind,
            ref_span: (ref_range.start, ref_range.end),
            hyp_span: (hyp_range.start, hyp_range.end),
            ref_text: ref_chars[ref_range].iter().collect(),
            hyp_text: hyp_chars[hyp_range].iter().collect(),
        })
        .collect()
}
