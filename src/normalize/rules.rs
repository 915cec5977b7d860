//! Character-class rules and the single-pass normalization pipeline.
//!
//! Per-character rule order is fixed so overlapping classes are never
//! double-deleted:
//!
//! 1. unconditional ornament removal (verse signs and sajdah marks)
//! 2. `remove_tashkeel` (harakat, Quranic annotation marks, tatweel)
//! 3. `remove_small_alef` (superscript alef)
//! 4. `ignore_hamazat` (hamza carriers to bare letters, standalone hamza
//!    deleted)
//! 5. `ignore_alef_maksoora`
//! 6. `ignore_taa_marboota` / `normalize_taat` (mutually exclusive)
//! 7. whitespace: deleted when `remove_spaces`, otherwise each run collapses
//!    to one ASCII space and leading/trailing runs are trimmed
//!
//! The pipeline is total: characters matching no class pass through
//! unchanged, and fully-removable input yields an empty normalized string
//! with an empty offset map.

use std::collections::{HashMap, HashSet};

use crate::config::NormalizeOptions;
use crate::types::NormalizedText;

/// Resolved character classes, independent of where they were defined
/// (rules resource for the table normalizer, compiled patterns for the
/// fallback classify via the same ordering).
#[derive(Debug, Clone, Default)]
pub(crate) struct RuleSet {
    pub always_removed: HashSet<char>,
    pub tashkeel: HashSet<char>,
    pub small_alef: HashSet<char>,
    pub hamazat_map: HashMap<char, char>,
    pub hamazat_removed: HashSet<char>,
    pub alef_maksoora: HashMap<char, char>,
    pub taa_marboota: HashMap<char, char>,
    pub taat: HashMap<char, char>,
}

impl RuleSet {
    /// Applies the letter classes (steps 1-6) to one character. `None`
    /// deletes the character.
    pub(crate) fn map_char(&self, ch: char, options: &NormalizeOptions) -> Option<char> {
        if self.always_removed.contains(&ch) {
            return None;
        }
        if options.remove_tashkeel && self.tashkeel.contains(&ch) {
            return None;
        }
        if options.remove_small_alef && self.small_alef.contains(&ch) {
            return None;
        }
        let mut ch = ch;
        if options.ignore_hamazat {
            if self.hamazat_removed.contains(&ch) {
                return None;
            }
            if let Some(&mapped) = self.hamazat_map.get(&ch) {
                ch = mapped;
            }
        }
        if options.ignore_alef_maksoora {
            if let Some(&mapped) = self.alef_maksoora.get(&ch) {
                ch = mapped;
            }
        }
        if options.ignore_taa_marboota {
            if let Some(&mapped) = self.taa_marboota.get(&ch) {
                ch = mapped;
            }
        } else if options.normalize_taat {
            if let Some(&mapped) = self.taat.get(&ch) {
                ch = mapped;
            }
        }
        Some(ch)
    }
}

/// Runs the whitespace step (7) around a per-character letter mapping,
/// recording one original-character index per surviving character.
pub(crate) fn normalize_chars<F>(
    text: &str,
    options: &NormalizeOptions,
    map_char: F,
) -> NormalizedText
where
    F: Fn(char) -> Option<char>,
{
    let mut normalized = String::new();
    let mut offset_map = Vec::new();
    // Original index of the first whitespace character in the current run,
    // emitted as a single space once a later character survives.
    let mut pending_space: Option<usize> = None;

    for (index, ch) in text.chars().enumerate() {
        if ch.is_whitespace() {
            if !options.remove_spaces && pending_space.is_none() {
                pending_space = Some(index);
            }
            continue;
        }
        let Some(out) = map_char(ch) else {
            continue;
        };
        if let Some(space_index) = pending_space.take() {
            if !offset_map.is_empty() {
                normalized.push(' ');
                offset_map.push(space_index);
            }
        }
        normalized.push(out);
        offset_map.push(index);
    }

    debug_assert_eq!(
        offset_map.len(),
        normalized.chars().count(),
        "offset map must carry one entry per normalized character"
    );
    debug_assert!(
        offset_map.windows(2).all(|pair| pair[0] <= pair[1]),
        "offset map must be monotonic non-decreasing"
    );

    NormalizedText {
        original: text.to_string(),
        normalized,
        offset_map,
    }
}
