//! The narrow interfaces the research core consumes.
//!
//! The retrieval tools and the citation verifier only ever see these traits;
//! [`crate::LegalLake`] implements all three over a single `DuckDB` file.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::LakeError;

/// A ranked phrase-index hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhraseHit {
    pub id: String,
    pub text: String,
    /// Cosine similarity to the query; higher ranks first.
    pub score: f64,
}

/// Authoritative text for one reference id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredText {
    pub id: String,
    pub text: String,
}

/// One row of a graph traversal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphRow {
    pub name: String,
    pub phrase: String,
    pub headings: String,
}

/// The two parameterized graph queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Traversal {
    /// Fragments inside the section(s) the key fragment refers to.
    Linked,
    /// Fragments of other documents that refer into a section enclosing the key.
    Referrers,
}

impl Traversal {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linked => "linked",
            Self::Referrers => "referrers",
        }
    }
}

/// Ranked nearest-match search over the phrase index.
#[async_trait]
pub trait PhraseIndex: Send + Sync {
    /// Up to `limit` hits in rank order. Several hits may share an id.
    async fn nearest(&self, query: &str, limit: usize) -> Result<Vec<PhraseHit>, LakeError>;
}

/// Parameterized traversal of the citation graph.
#[async_trait]
pub trait CitationGraph: Send + Sync {
    /// Up to `limit` rows in traversal order. Rows may repeat a name.
    async fn traverse(
        &self,
        traversal: Traversal,
        key: &str,
        limit: usize,
    ) -> Result<Vec<GraphRow>, LakeError>;
}

/// Equality lookup of authoritative fragment text.
#[async_trait]
pub trait CitationLookup: Send + Sync {
    async fn find_citation(&self, reference: &str) -> Result<Option<StoredText>, LakeError>;
}
