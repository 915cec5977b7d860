use serde::{Deserialize, Serialize};

use crate::error::VerifyError;

/// Engine configuration: where the normalization rules resource lives and
/// which normalization options apply when a request does not override them.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Path to the JSON rules resource consumed by the table normalizer.
    /// An empty path (or an unreadable file) selects the regex fallback.
    pub rules_path: String,
    pub options: NormalizeOptions,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            rules_path: String::new(),
            options: NormalizeOptions::default(),
        }
    }
}

/// Per-call normalization flags. Each flag gates one fixed character class;
/// the application order is fixed (see `normalize::rules`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    pub remove_spaces: bool,
    pub ignore_hamazat: bool,
    pub ignore_alef_maksoora: bool,
    pub ignore_taa_marboota: bool,
    pub normalize_taat: bool,
    pub remove_small_alef: bool,
    pub remove_tashkeel: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            remove_spaces: false,
            ignore_hamazat: true,
            ignore_alef_maksoora: true,
            ignore_taa_marboota: true,
            normalize_taat: false,
            remove_small_alef: true,
            remove_tashkeel: true,
        }
    }
}

impl NormalizeOptions {
    /// Both flags rewrite taa marboota, to different letters. Skipping one
    /// silently would change scoring undetectably, so the combination is
    /// rejected up front.
    pub fn validate(&self) -> Result<(), VerifyError> {
        if self.ignore_taa_marboota && self.normalize_taat {
            return Err(VerifyError::config(
                "ignore_taa_marboota and normalize_taat both rewrite taa marboota; enable at most one",
            ));
        }
        Ok(())
    }
}
