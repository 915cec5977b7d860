use std::ops::Range;

use serde::Serialize;

use crate::config::NormalizeOptions;

/// One verse check request: raw reference text, raw hypothesis transcript,
/// optional per-call normalization override.
#[derive(Debug, Clone)]
pub struct VerseInput {
    pub reference: String,
    pub hypothesis: String,
    pub options: Option<NormalizeOptions>,
}

/// One chapter check request: the canonical verse texts in order and a
/// single hypothesis transcript covering all of them.
#[derive(Debug, Clone)]
pub struct ChapterInput {
    pub verses: Vec<String>,
    pub hypothesis: String,
    pub options: Option<NormalizeOptions>,
}

/// A canonicalized string together with its provenance.
///
/// `offset_map[i]` is the ORIGINAL character index that produced normalized
/// character `i`. The map has exactly one entry per normalized character and
/// is monotonic non-decreasing, so any normalized span can be projected back
/// onto the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub original: String,
    pub normalized: String,
    pub offset_map: Vec<usize>,
}

impl NormalizedText {
    pub fn original_char_len(&self) -> usize {
        self.original.chars().count()
    }

    /// Projects a half-open normalized-character span onto original-character
    /// coordinates. The end extends to the original position of the next
    /// surviving character (or the end of the text), so characters deleted by
    /// normalization stay covered by the span that owns their base letter.
    pub fn original_span(&self, span: (usize, usize)) -> (usize, usize) {
        debug_assert!(span.0 <= span.1 && span.1 <= self.offset_map.len());
        if span.0 >= span.1 {
            let at = self
                .offset_map
                .get(span.0)
                .copied()
                .unwrap_or_else(|| self.original_char_len());
            return (at, at);
        }
        let start = self.offset_map[span.0];
        let end = if span.1 < self.offset_map.len() {
            self.offset_map[span.1]
        } else {
            self.original_char_len()
        };
        (start, end)
    }

    /// Substring of the ORIGINAL text over a half-open character range.
    pub fn slice_original(&self, start: usize, end: usize) -> String {
        self.original
            .chars()
            .skip(start)
            .take(end.saturating_sub(start))
            .collect()
    }

    /// Substring of the NORMALIZED text over a half-open character range.
    pub fn slice_normalized(&self, start: usize, end: usize) -> String {
        self.normalized
            .chars()
            .skip(start)
            .take(end.saturating_sub(start))
            .collect()
    }
}

/// A word of the ORIGINAL text, immutable once segmented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordToken {
    pub text: String,
    pub index: usize,
}

impl WordToken {
    /// Segments original text into word tokens on Unicode whitespace.
    pub fn segment(text: &str) -> Vec<WordToken> {
        text.split_whitespace()
            .enumerate()
            .map(|(index, word)| WordToken {
                text: word.to_string(),
                index,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Equal,
    Replace,
    Insert,
    Delete,
}

impl OpKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Replace => "replace",
            Self::Insert => "insert",
            Self::Delete => "delete",
        }
    }
}

/// One word-level edit block. Ops contiguously and completely partition both
/// word sequences in order; insert/delete carry exactly one empty range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordOp {
    pub kind: OpKind,
    pub ref_range: Range<usize>,
    pub hyp_range: Range<usize>,
    pub ref_words: Vec<String>,
    pub hyp_words: Vec<String>,
}

/// One character-level edit block within a word pair, in NORMALIZED
/// coordinates of both words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharOp {
    pub kind: OpKind,
    pub ref_span: (usize, usize),
    pub hyp_span: (usize, usize),
    pub ref_text: String,
    pub hyp_text: String,
}
