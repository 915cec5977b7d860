use std::path::Path;

use crate::config::VerifierConfig;
use crate::error::VerifyError;
use crate::normalize::{RegexNormalizer, TableNormalizer};
use crate::pipeline::runtime::{RecitationVerifier, VerifierParts};
use crate::pipeline::traits::Normalizer;

pub struct RecitationVerifierBuilder {
    config: VerifierConfig,
    normalizer: Option<Box<dyn Normalizer>>,
}

impl RecitationVerifierBuilder {
    pub fn new(config: VerifierConfig) -> Self {
        Self {
            config,
            normalizer: None,
        }
    }

    pub fn with_normalizer(mut self, normalizer: Box<dyn Normalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn build(self) -> Result<RecitationVerifier, VerifyError> {
        self.config.options.validate()?;
        let normalizer = match self.normalizer {
            Some(normalizer) => normalizer,
            None => select_normalizer(&self.config.rules_path)?,
        };
        Ok(RecitationVerifier::from_parts(VerifierParts {
            normalizer,
            default_options: self.config.options,
        }))
    }
}

/// Chooses the normalizer once per engine instance: the table normalizer
/// when the rules resource loads, the regex fallback otherwise. Resource
/// unavailability is recoverable and surfaces only through the reported
/// tool id.
fn select_normalizer(rules_path: &str) -> Result<Box<dyn Normalizer>, VerifyError> {
    if !rules_path.is_empty() {
        match TableNormalizer::load(Path::new(rules_path)) {
            Ok(table) => return Ok(Box::new(table)),
            Err(err) => {
                tracing::warn!(
                    rules_path,
                    error = %err,
                    "normalization rules unavailable, using regex fallback"
                );
            }
        }
    }
    Ok(Box::new(RegexNormalizer::new()?))
}
