use regex::Regex;

use crate::config::NormalizeOptions;
use crate::error::VerifyError;
use crate::normalize::rules::normalize_chars;
use crate::pipeline::traits::Normalizer;
use crate::types::NormalizedText;

pub const REGEX_FALLBACK_TOOL_ID: &str = "regex_fallback";

// Same character classes as the rules resource, as compiled patterns.
const ALWAYS_REMOVED: &str = r"[\u{06DD}\u{06DE}\u{06E9}]";
const TASHKEEL: &str = r"[\u{064B}-\u{065F}\u{0640}\u{06D6}-\u{06DC}\u{06DF}-\u{06E8}\u{06EA}-\u{06ED}]";
const SMALL_ALEF: &str = r"\u{0670}";
const HAMZA_TO_ALEF: &str = r"[\u{0622}\u{0623}\u{0625}\u{0671}]";
const HAMZA_TO_WAW: &str = r"\u{0624}";
const HAMZA_TO_YAA: &str = r"\u{0626}";
const HAMZA_REMOVED: &str = r"\u{0621}";
const ALEF_MAKSOORA: &str = r"\u{0649}";
const TAA_MARBOOTA: &str = r"\u{0629}";

/// Pattern-based fallback normalizer, selected when the rules resource is
/// unavailable. Same contract shape as the table normalizer; callers observe
/// only the reported tool id.
pub struct RegexNormalizer {
    always_removed: Regex,
    tashkeel: Regex,
    small_alef: Regex,
    hamza_to_alef: Regex,
    hamza_to_waw: Regex,
    hamza_to_yaa: Regex,
    hamza_removed: Regex,
    alef_maksoora: Regex,
    taa_marboota: Regex,
}

impl RegexNormalizer {
    pub fn new() -> Result<Self, VerifyError> {
        Ok(Self {
            always_removed: compile(ALWAYS_REMOVED)?,
            tashkeel: compile(TASHKEEL)?,
            small_alef: compile(SMALL_ALEF)?,
            hamza_to_alef: compile(HAMZA_TO_ALEF)?,
            hamza_to_waw: compile(HAMZA_TO_WAW)?,
            hamza_to_yaa: compile(HAMZA_TO_YAA)?,
            hamza_removed: compile(HAMZA_REMOVED)?,
            alef_maksoora: compile(ALEF_MAKSOORA)?,
            taa_marboota: compile(TAA_MARBOOTA)?,
        })
    }

    /// Mirrors `RuleSet::map_char`, class for class and in the same order.
    fn map_char(&self, ch: char, options: &NormalizeOptions) -> Option<char> {
        let mut buf = [0u8; 4];
        let s: &str = ch.encode_utf8(&mut buf);
        if self.always_removed.is_match(s) {
            return None;
        }
        if options.remove_tashkeel && self.tashkeel.is_match(s) {
            return None;
        }
        if options.remove_small_alef && self.small_alef.is_match(s) {
            return None;
        }
        let mut ch = ch;
        if options.ignore_hamazat {
            if self.hamza_removed.is_match(s) {
                return None;
            }
            if self.hamza_to_alef.is_match(s) {
                ch = 'ا';
            } else if self.hamza_to_waw.is_match(s) {
                ch = 'و';
            } else if self.hamza_to_yaa.is_match(s) {
                ch = 'ي';
            }
        }
        if options.ignore_alef_maksoora && self.alef_maksoora.is_match(s) {
            ch = 'ي';
        }
        if self.taa_marboota.is_match(s) {
            if options.ignore_taa_marboota {
                ch = 'ه';
            } else if options.normalize_taat {
                ch = 'ت';
            }
        }
        Some(ch)
    }
}

impl Normalizer for RegexNormalizer {
    fn id(&self) -> &'static str {
        REGEX_FALLBACK_TOOL_ID
    }

    fn normalize(
        &self,
        text: &str,
        options: &NormalizeOptions,
    ) -> Result<NormalizedText, VerifyError> {
        options.validate()?;
        Ok(normalize_chars(text, options, |ch| {
            self.map_char(ch, options)
        }))
    }
}

fn compile(pattern: &str) -> Result<Regex, VerifyError> {
    Regex::new(pattern).map_err(|e| VerifyError::runtime("compile fallback pattern", e))
}
