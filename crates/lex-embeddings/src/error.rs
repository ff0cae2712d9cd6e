//! Embedding error types.

/// Errors raised while turning text into query vectors.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// Model download or ONNX runtime initialization failed.
    #[error("Model initialization failed: {0}")]
    InitFailed(String),

    /// Inference failed for the given input.
    #[error("Embedding generation failed: {0}")]
    EmbedFailed(String),

    /// The model produced no vector for a single input.
    #[error("Empty result from embedding model")]
    EmptyResult,

    /// A previous embedding call panicked while holding the model lock.
    #[error("Embedding model lock poisoned")]
    Poisoned,
}
