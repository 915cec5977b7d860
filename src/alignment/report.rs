use serde::Serialize;

use crate::alignment::char_align::align_word_pair;
use crate::alignment::error_ranges::{extract_error_ranges, has_missing};
use crate::alignment::score::{round_percent, score_percent, Grade};
use crate::config::NormalizeOptions;
use crate::types::{CharOp, NormalizedText, OpKind, WordOp, WordToken};

/// Echo of the normalization configuration actually applied, including which
/// normalizer implementation answered (`rule_table` or `regex_fallback`).
#[derive(Debug, Clone, Serialize)]
pub struct Normalization {
    pub tool: String,
    pub remove_spaces: bool,
    pub ignore_hamazat: bool,
    pub ignore_alef_maksoora: bool,
    pub ignore_taa_marboota: bool,
    pub normalize_taat: bool,
    pub remove_small_alef: bool,
    pub remove_tashkeel: bool,
}

impl Normalization {
    pub(crate) fn new(tool: &str, options: &NormalizeOptions) -> Self {
        Self {
            tool: tool.to_string(),
            remove_spaces: options.remove_spaces,
            ignore_hamazat: options.ignore_hamazat,
            ignore_alef_maksoora: options.ignore_alef_maksoora,
            ignore_taa_marboota: options.ignore_taa_marboota,
            normalize_taat: options.normalize_taat,
            remove_small_alef: options.remove_small_alef,
            remove_tashkeel: options.remove_tashkeel,
        }
    }
}

/// Word-level wire record: half-open word-index ranges over both sequences.
#[derive(Debug, Clone, Serialize)]
pub struct WordOpRecord {
    pub op: OpKind,
    pub ref_start: usize,
    pub ref_end: usize,
    pub hyp_start: usize,
    pub hyp_end: usize,
    pub ref_words: Vec<String>,
    pub hyp_words: Vec<String>,
}

impl From<&WordOp> for WordOpRecord {
    fn from(op: &WordOp) -> Self {
        Self {
            op: op.kind,
            ref_start: op.ref_range.start,
            ref_end: op.ref_range.end,
            hyp_start: op.hyp_range.start,
            hyp_end: op.hyp_range.end,
            ref_words: op.ref_words.clone(),
            hyp_words: op.hyp_words.clone(),
        }
    }
}

/// Character-level wire record in normalized coordinates of the word pair.
#[derive(Debug, Clone, Serialize)]
pub struct CharOpRecord {
    pub op: OpKind,
    pub ref_span: [usize; 2],
    pub hyp_span: [usize; 2],
    #[serde(rename = "ref")]
    pub ref_text: String,
    #[serde(rename = "hyp")]
    pub hyp_text: String,
}

impl From<&CharOp> for CharOpRecord {
    fn from(op: &CharOp) -> Self {
        Self {
            op: op.kind,
            ref_span: [op.ref_span.0, op.ref_span.1],
            hyp_span: [op.hyp_span.0, op.hyp_span.1],
            ref_text: op.ref_text.clone(),
            hyp_text: op.hyp_text.clone(),
        }
    }
}

/// Per-word spell record: one entry per word slot of the alignment, with
/// character detail and highlight ranges in ORIGINAL hypothesis-word
/// coordinates.
#[derive(Debug, Clone, Serialize)]
pub struct SpellRecord {
    pub op: OpKind,
    pub ref_idx: Option<usize>,
    pub hyp_idx: Option<usize>,
    pub ref_word: String,
    pub hyp_word: String,
    pub ref_norm: String,
    pub hyp_norm: String,
    pub hyp_char_ops: Vec<CharOpRecord>,
    pub hyp_error_ranges: Vec<[usize; 2]>,
    pub has_missing: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpellCheckData {
    pub normalization: Normalization,
    pub words: Vec<SpellRecord>,
}

/// The per-verse alignment report.
#[derive(Debug, Clone, Serialize)]
pub struct VerseReport {
    pub ref_words: Vec<String>,
    pub hyp_words: Vec<String>,
    pub word_ops: Vec<WordOpRecord>,
    pub spells: SpellCheckData,
    pub score_percent: f64,
    pub status: Grade,
    pub advice: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChapterVerseReport {
    pub verse_number: usize,
    pub report: VerseReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChapterReport {
    pub verses: Vec<ChapterVerseReport>,
    pub correct_verses: usize,
    pub total_verses: usize,
    pub all_correct: bool,
    pub score_percent: f64,
}

/// Assembles the per-verse report from segmented tokens, their normalized
/// forms, and the word-level alignment.
pub(crate) fn build_verse_report(
    ref_tokens: &[WordToken],
    ref_norms: &[NormalizedText],
    hyp_tokens: &[WordToken],
    hyp_norms: &[NormalizedText],
    word_ops: &[WordOp],
    normalization: Normalization,
) -> VerseReport {
    debug_assert_eq!(ref_tokens.len(), ref_norms.len());
    debug_assert_eq!(hyp_tokens.len(), hyp_norms.len());

    let score = score_percent(ref_norms.len(), hyp_norms.len(), word_ops);
    let grade = Grade::from_score(score);
    let words = spell_records(ref_tokens, ref_norms, hyp_tokens, hyp_norms, word_ops);

    VerseReport {
        ref_words: ref_norms.iter().map(|w| w.normalized.clone()).collect(),
        hyp_words: hyp_norms.iter().map(|w| w.normalized.clone()).collect(),
        word_ops: word_ops.iter().map(WordOpRecord::from).collect(),
        spells: SpellCheckData {
            normalization,
            words,
        },
        score_percent: round_percent(score),
        status: grade,
        advice: grade.advice().to_string(),
    }
}

fn spell_records(
    ref_tokens: &[WordToken],
    ref_norms: &[NormalizedText],
    hyp_tokens: &[WordToken],
    hyp_norms: &[NormalizedText],
    word_ops: &[WordOp],
) -> Vec<SpellRecord> {
    let mut records = Vec::new();
    for op in word_ops {
        match op.kind {
            OpKind::Equal => {
                for (ref_idx, hyp_idx) in op.ref_range.clone().zip(op.hyp_range.clone()) {
                    records.push(pair_record(
                        OpKind::Equal,
                        &ref_tokens[ref_idx],
                        &ref_norms[ref_idx],
                        &hyp_tokens[hyp_idx],
                        &hyp_norms[hyp_idx],
                    ));
                }
            }
            OpKind::Replace => {
                if op.ref_range.len() == 1 && op.hyp_range.len() == 1 {
                    let ref_idx = op.ref_range.start;
                    let hyp_idx = op.hyp_range.start;
                    records.push(pair_record(
                        OpKind::Replace,
                        &ref_tokens[ref_idx],
                        &ref_norms[ref_idx],
                        &hyp_tokens[hyp_idx],
                        &hyp_norms[hyp_idx],
                    ));
                } else {
                    records.push(opaque_replace_record(op, ref_tokens, ref_norms, hyp_tokens, hyp_norms));
                }
            }
            OpKind::Delete => {
                for ref_idx in op.ref_range.clone() {
                    records.push(SpellRecord {
                        op: OpKind::Delete,
                        ref_idx: Some(ref_tokens[ref_idx].index),
                        hyp_idx: None,
                        ref_word: ref_tokens[ref_idx].text.clone(),
                        hyp_word: String::new(),
                        ref_norm: ref_norms[ref_idx].normalized.clone(),
                        hyp_norm: String::new(),
                        hyp_char_ops: Vec::new(),
                        hyp_error_ranges: Vec::new(),
                        has_missing: true,
                    });
                }
            }
            OpKind::Insert => {
                for hyp_idx in op.hyp_range.clone() {
                    let hyp_norm = &hyp_norms[hyp_idx];
                    let char_ops = align_word_pair("", &hyp_norm.normalized);
                    let ranges = extract_error_ranges(&char_ops, hyp_norm);
                    records.push(SpellRecord {
                        op: OpKind::Insert,
                        ref_idx: None,
                        hyp_idx: Some(hyp_tokens[hyp_idx].index),
                        ref_word: String::new(),
                        hyp_word: hyp_tokens[hyp_idx].text.clone(),
                        ref_norm: String::new(),
                        hyp_norm: hyp_norm.normalized.clone(),
                        hyp_char_ops: char_ops.iter().map(CharOpRecord::from).collect(),
                        hyp_error_ranges: ranges,
                        has_missing: false,
                    });
                }
            }
        }
    }
    records
}

fn pair_record(
    word_kind: OpKind,
    ref_token: &WordToken,
    ref_norm: &NormalizedText,
    hyp_token: &WordToken,
    hyp_norm: &NormalizedText,
) -> SpellRecord {
    let char_ops = align_word_pair(&ref_norm.normalized, &hyp_norm.normalized);
    let ranges = extract_error_ranges(&char_ops, hyp_norm);
    let missing = has_missing(word_kind, &char_ops, ref_norm.normalized.chars().count());
    // Re-derive the record kind from normalized equality so a pair whose
    // normalized forms agree reports as equal even inside a replace block.
    let op = if ref_norm.normalized == hyp_norm.normalized {
        OpKind::Equal
    } else {
        OpKind::Replace
    };
    SpellRecord {
        op,
        ref_idx: Some(ref_token.index),
        hyp_idx: Some(hyp_token.index),
        ref_word: ref_token.text.clone(),
        hyp_word: hyp_token.text.clone(),
        ref_norm: ref_norm.normalized.clone(),
        hyp_norm: hyp_norm.normalized.clone(),
        hyp_char_ops: char_ops.iter().map(CharOpRecord::from).collect(),
        hyp_error_ranges: ranges,
        has_missing: missing,
    }
}

/// Replace blocks wider than one word on either side carry no character
/// detail: character alignment across word boundaries is not well-defined.
fn opaque_replace_record(
    op: &WordOp,
    ref_tokens: &[WordToken],
    ref_norms: &[NormalizedText],
    hyp_tokens: &[WordToken],
    hyp_norms: &[NormalizedText],
) -> SpellRecord {
    let join = |tokens: &[WordToken]| {
        tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    };
    let join_norm = |norms: &[NormalizedText]| {
        norms
            .iter()
            .map(|n| n.normalized.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    };
    SpellRecord {
        op: OpKind::Replace,
        ref_idx: None,
        hyp_idx: None,
        ref_word: join(&ref_tokens[op.ref_range.clone()]),
        hyp_word: join(&hyp_tokens[op.hyp_range.clone()]),
        ref_norm: join_norm(&ref_norms[op.ref_range.clone()]),
        hyp_norm: join_norm(&hyp_norms[op.hyp_range.clone()]),
        hyp_char_ops: Vec::new(),
        hyp_error_ranges: Vec::new(),
        has_missing: false,
    }
}
