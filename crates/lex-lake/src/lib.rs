//! # lex-lake
//!
//! `DuckDB` storage for the Lexa legal corpus.
//!
//! One file holds both collaborators of a research run:
//! - the phrase index (`phrases`), searched by cosine similarity over
//!   fastembed vectors and used as the authoritative text store when
//!   verifying citations
//! - the citation graph (`fragments`, `sections`, `refers_to`, `child_of`),
//!   walked with recursive queries
//!
//! The lake is opened once per run and is read-only from the research core's
//! point of view; the bulk-insert methods in [`store`] exist for ingestion and
//! tests.

pub mod error;
pub mod graph;
pub mod phrases;
pub mod schemas;
pub mod store;
pub mod traits;

use std::sync::{Arc, Mutex, MutexGuard};

use duckdb::Connection;
use lex_embeddings::TextEmbedder;

pub use error::LakeError;
pub use schemas::{ChildOfRow, FragmentRow, PhraseRow, RefersToRow};
pub use traits::{CitationGraph, CitationLookup, GraphRow, PhraseHit, PhraseIndex, StoredText, Traversal};

/// Local `DuckDB` lake holding the phrase index and the citation graph.
///
/// Clones share the connection and the embedder.
#[derive(Clone)]
pub struct LegalLake {
    conn: Arc<Mutex<Connection>>,
    embedder: Option<Arc<dyn TextEmbedder>>,
}

impl LegalLake {
    /// Open or create a lake file.
    ///
    /// Creates all tables and indexes if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if the file cannot be opened or schema creation fails.
    pub fn open_local(path: &str) -> Result<Self, LakeError> {
        tracing::debug!(path, "opening legal lake");
        Self::from_connection(Connection::open(path)?)
    }

    /// Open an in-memory lake (for testing).
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if schema creation fails.
    pub fn open_in_memory() -> Result<Self, LakeError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Attach the embedder used to turn phrase-search queries into vectors.
    #[must_use]
    pub fn with_embedder(mut self, embedder: Arc<dyn TextEmbedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    fn from_connection(conn: Connection) -> Result<Self, LakeError> {
        let lake = Self {
            conn: Arc::new(Mutex::new(conn)),
            embedder: None,
        };
        lake.init_schema()?;
        Ok(lake)
    }

    /// Lock the connection for one synchronous unit of work.
    ///
    /// The guard must never be held across an `.await`.
    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>, LakeError> {
        self.conn.lock().map_err(|_| LakeError::Poisoned)
    }

    /// Run synchronous lake work on tokio's blocking pool.
    pub(crate) async fn blocking<T, F>(&self, work: F) -> Result<T, LakeError>
    where
        F: FnOnce(&Self) -> Result<T, LakeError> + Send + 'static,
        T: Send + 'static,
    {
        let lake = self.clone();
        tokio::task::spawn_blocking(move || work(&lake)).await?
    }

    pub(crate) fn embedder(&self) -> Result<&dyn TextEmbedder, LakeError> {
        self.embedder.as_deref().ok_or(LakeError::NoEmbedder)
    }

    fn init_schema(&self) -> Result<(), LakeError> {
        let conn = self.conn()?;
        conn.execute_batch(schemas::CREATE_PHRASES)?;
        conn.execute_batch(schemas::CREATE_FRAGMENTS)?;
        conn.execute_batch(schemas::CREATE_SECTIONS)?;
        conn.execute_batch(schemas::CREATE_REFERS_TO)?;
        conn.execute_batch(schemas::CREATE_CHILD_OF)?;
        conn.execute_batch(schemas::CREATE_INDEXES)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use lex_embeddings::{EMBEDDING_DIM, EmbeddingError, TextEmbedder};

    /// Deterministic embedding from a seed.
    pub fn synthetic_embedding(seed: u32) -> Vec<f32> {
        (0..EMBEDDING_DIM)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)] // Test helper; seeds are small
                let base = (seed as f32) / 100.0;
                #[allow(clippy::cast_precision_loss)]
                let variation = (i as f32) / 384.0;
                (base + variation).sin()
            })
            .collect()
    }

    /// Embeds any query as the vector of a fixed seed.
    pub struct SeededEmbedder(pub u32);

    impl TextEmbedder for SeededEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Ok(synthetic_embedding(self.0))
        }
    }
}
