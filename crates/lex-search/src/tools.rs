//! The three retrieval tools offered to the research model.
//!
//! Each tool wraps one store query and owns the clean-up the stores leave to
//! the caller: duplicate ids, the queried fragment showing up in its own
//! neighbourhood, and the result cap.

use std::collections::HashSet;
use std::sync::Arc;

use lex_core::{Citation, document_prefix};
use lex_lake::{CitationGraph, GraphRow, PhraseHit, PhraseIndex, Traversal};

use crate::error::SearchError;

/// Default cap for both phrase search and graph traversals.
pub const DEFAULT_LIMIT: usize = 20;

/// Retrieval tools bound to one run's stores and limits.
#[derive(Clone)]
pub struct RetrievalTools {
    phrases: Arc<dyn PhraseIndex>,
    graph: Arc<dyn CitationGraph>,
    pub phrase_limit: usize,
    pub link_limit: usize,
}

impl RetrievalTools {
    /// Tools over the given stores, both limited to [`DEFAULT_LIMIT`].
    pub fn new(phrases: Arc<dyn PhraseIndex>, graph: Arc<dyn CitationGraph>) -> Self {
        Self {
            phrases,
            graph,
            phrase_limit: DEFAULT_LIMIT,
            link_limit: DEFAULT_LIMIT,
        }
    }

    #[must_use]
    pub const fn with_limits(mut self, phrase_limit: usize, link_limit: usize) -> Self {
        self.phrase_limit = phrase_limit;
        self.link_limit = link_limit;
        self
    }

    /// Semantic lookup of legislation by phrase.
    ///
    /// The index can rank several phrases of one fragment, so twice `limit`
    /// hits are fetched before deduplicating. A heavily duplicated ranking can
    /// still yield fewer than `limit` citations.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Lake`] if the phrase index fails.
    pub async fn semantic_lookup(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Citation>, SearchError> {
        let hits = self.phrases.nearest(query, limit.saturating_mul(2)).await?;
        let fetched = hits.len();
        let citations = unique_phrase_hits(hits, limit);
        tracing::debug!(
            tool = "get_legislation",
            limit,
            rows = fetched,
            kept = citations.len(),
            "semantic lookup"
        );
        Ok(citations)
    }

    /// Fragments sharing a cited section with `reference_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Lake`] if the graph query fails.
    pub async fn linked_lookup(
        &self,
        reference_id: &str,
        limit: usize,
    ) -> Result<Vec<Citation>, SearchError> {
        let rows = self
            .graph
            .traverse(Traversal::Linked, reference_id, limit)
            .await?;
        let citations = unique_graph_rows(rows, limit, |name| name == reference_id);
        tracing::debug!(
            tool = "get_linked",
            reference_id,
            limit,
            kept = citations.len(),
            "linked lookup"
        );
        Ok(citations)
    }

    /// Fragments of other documents that cite into `reference_id`'s section.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Lake`] if the graph query fails.
    pub async fn referrer_lookup(
        &self,
        reference_id: &str,
        limit: usize,
    ) -> Result<Vec<Citation>, SearchError> {
        let rows = self
            .graph
            .traverse(Traversal::Referrers, reference_id, limit)
            .await?;
        let own_document = document_prefix(reference_id);
        let citations = unique_graph_rows(rows, limit, |name| {
            name == reference_id || document_prefix(name) == own_document
        });
        tracing::debug!(
            tool = "get_referrers",
            reference_id,
            limit,
            kept = citations.len(),
            "referrer lookup"
        );
        Ok(citations)
    }
}

/// First `limit` hits with distinct ids, in rank order.
fn unique_phrase_hits(hits: Vec<PhraseHit>, limit: usize) -> Vec<Citation> {
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| seen.insert(hit.id.clone()))
        .take(limit)
        .map(|hit| Citation::new(hit.id, hit.text))
        .collect()
}

/// First `limit` rows with distinct names that `exclude` lets through, in
/// traversal order. The fragment phrase becomes the citation text.
fn unique_graph_rows(
    rows: Vec<GraphRow>,
    limit: usize,
    exclude: impl Fn(&str) -> bool,
) -> Vec<Citation> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| !exclude(&row.name))
        .filter(|row| seen.insert(row.name.clone()))
        .take(limit)
        .map(|row| Citation::new(row.name, row.phrase))
        .collect()
}
