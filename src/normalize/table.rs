use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::config::NormalizeOptions;
use crate::error::VerifyError;
use crate::normalize::rules::{normalize_chars, RuleSet};
use crate::pipeline::traits::Normalizer;
use crate::types::NormalizedText;

pub const RULE_TABLE_TOOL_ID: &str = "rule_table";

const SUPPORTED_RULES_VERSION: u32 = 1;

/// Primary normalizer, backed by a JSON rules resource that enumerates the
/// character classes and replacement maps.
#[derive(Debug)]
pub struct TableNormalizer {
    rules: RuleSet,
}

#[derive(Debug, Deserialize)]
struct RulesFile {
    version: u32,
    always_removed: Vec<String>,
    tashkeel: Vec<String>,
    small_alef: Vec<String>,
    hamazat: HamazatSpec,
    alef_maksoora: HashMap<String, String>,
    taa_marboota: HashMap<String, String>,
    taat: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct HamazatSpec {
    map: HashMap<String, String>,
    removed: Vec<String>,
}

impl TableNormalizer {
    pub fn load(path: &Path) -> Result<Self, VerifyError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| VerifyError::io("read normalization rules", e))?;
        let file: RulesFile = serde_json::from_str(&data)
            .map_err(|e| VerifyError::json("parse normalization rules", e))?;
        if file.version != SUPPORTED_RULES_VERSION {
            return Err(VerifyError::invalid_input(format!(
                "unsupported normalization rules version {}",
                file.version
            )));
        }
        Ok(Self {
            rules: RuleSet {
                always_removed: char_set("always_removed", &file.always_removed)?,
                tashkeel: char_set("tashkeel", &file.tashkeel)?,
                small_alef: char_set("small_alef", &file.small_alef)?,
                hamazat_map: char_map("hamazat.map", &file.hamazat.map)?,
                hamazat_removed: char_set("hamazat.removed", &file.hamazat.removed)?,
                alef_maksoora: char_map("alef_maksoora", &file.alef_maksoora)?,
                taa_marboota: char_map("taa_marboota", &file.taa_marboota)?,
                taat: char_map("taat", &file.taat)?,
            },
        })
    }
}

impl Normalizer for TableNormalizer {
    fn id(&self) -> &'static str {
        RULE_TABLE_TOOL_ID
    }

    fn normalize(
        &self,
        text: &str,
        options: &NormalizeOptions,
    ) -> Result<NormalizedText, VerifyError> {
        options.validate()?;
        Ok(normalize_chars(text, options, |ch| {
            self.rules.map_char(ch, options)
        }))
    }
}

fn single_char(field: &'static str, entry: &str) -> Result<char, VerifyError> {
    let mut chars = entry.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(VerifyError::invalid_input(format!(
            "rules entry in '{field}' must be exactly one character, got {entry:?}"
        ))),
    }
}

fn char_set(field: &'static str, entries: &[String]) -> Result<HashSet<char>, VerifyError> {
    entries
        .iter()
        .map(|entry| single_char(field, entry))
        .collect()
}

fn char_map(
    field: &'static str,
    entries: &HashMap<String, String>,
) -> Result<HashMap<char, char>, VerifyError> {
    entries
        .iter()
        .map(|(from, to)| Ok((single_char(field, from)?, single_char(field, to)?)))
        .collect()
}
