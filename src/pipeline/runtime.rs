use crate::alignment::report::{
    build_verse_report, ChapterReport, ChapterVerseReport, Normalization, VerseReport,
};
use crate::alignment::score::{round_percent, score_percent, Grade};
use crate::alignment::verse_split::split_hypothesis;
use crate::alignment::word_align::align_words;
use crate::config::NormalizeOptions;
use crate::error::VerifyError;
use crate::pipeline::traits::Normalizer;
use crate::types::{ChapterInput, NormalizedText, VerseInput, WordToken};

/// The assembled engine: a pure, synchronous computation over request-local
/// data. One instance safely serves concurrent requests with differing
/// per-call options.
pub struct RecitationVerifier {
    normalizer: Box<dyn Normalizer>,
    default_options: NormalizeOptions,
}

pub(crate) struct VerifierParts {
    pub normalizer: Box<dyn Normalizer>,
    pub default_options: NormalizeOptions,
}

impl RecitationVerifier {
    pub(crate) fn from_parts(parts: VerifierParts) -> Self {
        Self {
            normalizer: parts.normalizer,
            default_options: parts.default_options,
        }
    }

    pub fn normalizer_id(&self) -> &'static str {
        self.normalizer.id()
    }

    pub fn default_options(&self) -> NormalizeOptions {
        self.default_options
    }

    /// Checks one hypothesis transcript against one reference verse.
    pub fn verify_verse(&self, input: &VerseInput) -> Result<VerseReport, VerifyError> {
        let options = input.options.unwrap_or(self.default_options);
        options.validate()?;

        let ref_tokens = WordToken::segment(&input.reference);
        let hyp_tokens = WordToken::segment(&input.hypothesis);
        let ref_norms = self.normalize_tokens(&ref_tokens, &options)?;
        let hyp_norms = self.normalize_tokens(&hyp_tokens, &options)?;

        let word_ops = align_words(&ref_norms, &hyp_norms);
        tracing::debug!(
            ref_words = ref_norms.len(),
            hyp_words = hyp_norms.len(),
            ops = word_ops.len(),
            "verse alignment complete"
        );

        Ok(build_verse_report(
            &ref_tokens,
            &ref_norms,
            &hyp_tokens,
            &hyp_norms,
            &word_ops,
            self.normalization_meta(&options),
        ))
    }

    /// Checks one hypothesis transcript against a whole chapter: a
    /// chapter-level alignment assigns each verse its hypothesis slice,
    /// then every verse is reported individually.
    pub fn verify_chapter(&self, input: &ChapterInput) -> Result<ChapterReport, VerifyError> {
        let options = input.options.unwrap_or(self.default_options);
        options.validate()?;

        let hyp_tokens = WordToken::segment(&input.hypothesis);
        let hyp_norms = self.normalize_tokens(&hyp_tokens, &options)?;

        let mut verse_words: Vec<(Vec<WordToken>, Vec<NormalizedText>)> = Vec::new();
        let mut verse_bounds = Vec::with_capacity(input.verses.len());
        let mut chapter_norms: Vec<NormalizedText> = Vec::new();
        for verse in &input.verses {
            let tokens = WordToken::segment(verse);
            let norms = self.normalize_tokens(&tokens, &options)?;
            let start = chapter_norms.len();
            chapter_norms.extend(norms.iter().cloned());
            verse_bounds.push(start..chapter_norms.len());
            verse_words.push((tokens, norms));
        }

        let chapter_ops = align_words(&chapter_norms, &hyp_norms);
        let chapter_score = score_percent(chapter_norms.len(), hyp_norms.len(), &chapter_ops);
        let hyp_ranges = split_hypothesis(
            &chapter_ops,
            &verse_bounds,
            chapter_norms.len(),
            hyp_norms.len(),
        );

        let mut verses = Vec::with_capacity(verse_words.len());
        let mut correct_verses = 0usize;
        for (verse_idx, ((ref_tokens, ref_norms), hyp_range)) in
            verse_words.iter().zip(hyp_ranges.iter()).enumerate()
        {
            // Verse-local hypothesis tokens are re-indexed so spell records
            // point into the verse slice, not the whole transcript.
            let slice_tokens: Vec<WordToken> = hyp_tokens[hyp_range.clone()]
                .iter()
                .enumerate()
                .map(|(index, token)| WordToken {
                    text: token.text.clone(),
                    index,
                })
                .collect();
            let slice_norms = hyp_norms[hyp_range.clone()].to_vec();

            let word_ops = align_words(ref_norms, &slice_norms);
            let report = build_verse_report(
                ref_tokens,
                ref_norms,
                &slice_tokens,
                &slice_norms,
                &word_ops,
                self.normalization_meta(&options),
            );
            if report.status == Grade::Correct {
                correct_verses += 1;
            }
            verses.push(ChapterVerseReport {
                verse_number: verse_idx + 1,
                report,
            });
        }

        let total_verses = verses.len();
        Ok(ChapterReport {
            verses,
            correct_verses,
            total_verses,
            all_correct: correct_verses == total_verses,
            score_percent: round_percent(chapter_score),
        })
    }

    fn normalize_tokens(
        &self,
        tokens: &[WordToken],
        options: &NormalizeOptions,
    ) -> Result<Vec<NormalizedText>, VerifyError> {
        tokens
            .iter()
            .map(|token| self.normalizer.normalize(&token.text, options))
            .collect()
    }

    fn normalization_meta(&self, options: &NormalizeOptions) -> Normalization {
        Normalization::new(self.normalizer.id(), options)
    }
}
