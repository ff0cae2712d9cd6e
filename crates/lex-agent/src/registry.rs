//! Every citation the model has been shown during one run.

use std::collections::{BTreeMap, HashMap};

use lex_core::Citation;

/// Reference id to citation, in first-seen order.
///
/// Re-inserting an id replaces the stored citation but keeps its position.
/// Nothing is ever removed.
#[derive(Debug, Default)]
pub struct ReferenceRegistry {
    citations: Vec<Citation>,
    index: HashMap<String, usize>,
}

impl ReferenceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, citation: Citation) {
        match self.index.get(&citation.reference) {
            Some(&slot) => self.citations[slot] = citation,
            None => {
                self.index
                    .insert(citation.reference.clone(), self.citations.len());
                self.citations.push(citation);
            }
        }
    }

    #[must_use]
    pub fn get(&self, reference: &str) -> Option<&Citation> {
        self.index.get(reference).map(|&slot| &self.citations[slot])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.citations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Citation> {
        self.citations.iter()
    }

    /// Distinct act titles with fragment counts, sorted by title, as markdown.
    ///
    /// Citations without an act title are left out.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut by_title: BTreeMap<&str, usize> = BTreeMap::new();
        for title in self.citations.iter().filter_map(Citation::act_title) {
            *by_title.entry(title).or_default() += 1;
        }

        let mut lines = vec!["## Act Fragments processed".to_string()];
        lines.extend(by_title.iter().map(|(title, count)| format!("- {title} ({count})")));
        lines.join("\n")
    }
}
