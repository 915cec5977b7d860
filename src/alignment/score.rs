use serde::Serialize;

use crate::types::{OpKind, WordOp};

/// Grade boundaries over the percentage score.
pub const CORRECT_THRESHOLD: f64 = 92.0;
pub const PARTIAL_THRESHOLD: f64 = 70.0;

/// Percentage score in [0, 100]: `100 * (1 - edit_cost / ref_word_count)`,
/// clamped. Replace/delete blocks cost the number of reference positions
/// they touch; an insert block has no reference length and costs a fixed
/// unit penalty.
///
/// An empty reference scores 100 against an empty hypothesis and 0 against
/// anything else.
pub fn score_percent(ref_word_count: usize, hyp_word_count: usize, word_ops: &[WordOp]) -> f64 {
    if ref_word_count == 0 {
        return if hyp_word_count == 0 { 100.0 } else { 0.0 };
    }
    let edit_cost: usize = word_ops
        .iter()
        .map(|op| match op.kind {
            OpKind::Equal => 0,
            OpKind::Replace | OpKind::Delete => op.ref_range.len(),
            OpKind::Insert => 1,
        })
        .sum();
    (100.0 * (1.0 - edit_cost as f64 / ref_word_count as f64)).clamp(0.0, 100.0)
}

/// Rounds a percentage to two decimals for reporting.
pub(crate) fn round_percent(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Correct,
    Partial,
    Incorrect,
}

impl Grade {
    pub fn from_score(score_percent: f64) -> Self {
        if score_percent >= CORRECT_THRESHOLD {
            Self::Correct
        } else if score_percent >= PARTIAL_THRESHOLD {
            Self::Partial
        } else {
            Self::Incorrect
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            Self::Correct => "Excellent: the recitation matches the reference.",
            Self::Partial => {
                "Partially correct: review the highlighted words and recite them again slowly."
            }
            Self::Incorrect => {
                "Needs another attempt: slow down and focus on each word of the verse."
            }
        }
    }
}
