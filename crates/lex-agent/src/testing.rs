//! Test doubles shared by the run-loop tests.

use std::collections::HashMap;

use async_trait::async_trait;
use lex_lake::{CitationLookup, LakeError, StoredText};

#[derive(Default)]
pub struct MemoryStore {
    texts: HashMap<String, String>,
}

impl MemoryStore {
    pub fn with(entries: &[(&str, &str)]) -> Self {
        Self {
            texts: entries
                .iter()
                .map(|(id, text)| ((*id).to_string(), (*text).to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl CitationLookup for MemoryStore {
    async fn find_citation(&self, reference: &str) -> Result<Option<StoredText>, LakeError> {
        Ok(self.texts.get(reference).map(|text| StoredText {
            id: reference.to_string(),
            text: text.clone(),
        }))
    }
}
