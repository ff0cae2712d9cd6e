//! Lake error types.

use lex_embeddings::EmbeddingError;

/// Errors raised by the phrase index and citation graph.
#[derive(Debug, thiserror::Error)]
pub enum LakeError {
    /// `DuckDB` operation failed.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// Query text could not be embedded for phrase search.
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Phrase search was requested on a lake opened without an embedder.
    #[error("Phrase search needs an embedder; open the lake with one attached")]
    NoEmbedder,

    /// An embedding does not match the index dimensionality.
    #[error("Embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A previous query panicked while holding the connection.
    #[error("Lake connection lock poisoned")]
    Poisoned,

    /// A blocking lake task panicked or was cancelled.
    #[error("Lake task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
