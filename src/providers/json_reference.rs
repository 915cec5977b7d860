use std::collections::HashMap;
use std::path::Path;

use crate::error::VerifyError;
use crate::pipeline::traits::ReferenceProvider;

/// File-backed reference text lookup for the CLI and tests. The resource is
/// a JSON object mapping chapter numbers to ordered verse arrays:
/// `{"1": ["verse one", "verse two", ...]}`.
#[derive(Debug)]
pub struct JsonReferenceProvider {
    chapters: HashMap<u32, Vec<String>>,
}

impl JsonReferenceProvider {
    pub fn load(path: &Path) -> Result<Self, VerifyError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| VerifyError::io("read reference text file", e))?;
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(&data)
            .map_err(|e| VerifyError::json("parse reference text file", e))?;
        let mut chapters = HashMap::with_capacity(raw.len());
        for (key, verses) in raw {
            let chapter: u32 = key.parse().map_err(|_| {
                VerifyError::invalid_input(format!("chapter key {key:?} is not a number"))
            })?;
            chapters.insert(chapter, verses);
        }
        Ok(Self { chapters })
    }

    fn chapter(&self, chapter: u32) -> Result<&Vec<String>, VerifyError> {
        self.chapters.get(&chapter).ok_or_else(|| {
            VerifyError::invalid_input(format!("chapter {chapter} not present in reference file"))
        })
    }
}

impl ReferenceProvider for JsonReferenceProvider {
    fn verse_text(&self, chapter: u32, verse: u32) -> Result<String, VerifyError> {
        let verses = self.chapter(chapter)?;
        verses
            .get((verse as usize).wrapping_sub(1))
            .cloned()
            .ok_or_else(|| {
                VerifyError::invalid_input(format!("verse {verse} not present in chapter {chapter}"))
            })
    }

    fn verse_count(&self, chapter: u32) -> Result<usize, VerifyError> {
        Ok(self.chapter(chapter)?.len())
    }
}
