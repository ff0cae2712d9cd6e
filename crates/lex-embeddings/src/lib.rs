//! # lex-embeddings
//!
//! Query embedding for the Lexa phrase index using fastembed (ONNX runtime).
//!
//! The phrase index was built with `AllMiniLML6V2` (sentence-transformers
//! all-MiniLM-L6-v2), so search queries must be embedded with the same model:
//! 384-dimensional vectors, mean pooling, no query/passage prefix.
//!
//! Stores depend on the [`TextEmbedder`] trait rather than on the engine, so
//! tests can substitute deterministic vectors.

pub mod error;

use std::path::PathBuf;
use std::sync::Mutex;

pub use error::EmbeddingError;
use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};

/// Dimensionality of every vector stored in or searched against the phrase index.
pub const EMBEDDING_DIM: usize = 384;

/// Anything that can turn a search phrase into a query vector.
pub trait TextEmbedder: Send + Sync {
    /// Embed a single text.
    ///
    /// # Errors
    ///
    /// Returns an [`EmbeddingError`] if the underlying model fails.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Local embedding engine backed by fastembed.
///
/// [`TextEmbedding::embed`] requires `&mut self`; the model sits behind a
/// mutex so one engine can be shared by the stores of a run.
pub struct EmbeddingEngine {
    model: Mutex<TextEmbedding>,
}

impl EmbeddingEngine {
    /// Create an engine, downloading the model into `cache_dir` on first use.
    ///
    /// `None` caches under `~/.lexa/cache/fastembed`.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::InitFailed`] if model download or ONNX
    /// initialization fails.
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self, EmbeddingError> {
        let cache_dir = cache_dir.unwrap_or_else(default_cache_dir);
        tracing::debug!(cache_dir = %cache_dir.display(), "initializing embedding model");

        let model = TextEmbedding::try_new(
            TextInitOptions::new(EmbeddingModel::AllMiniLML6V2)
                .with_cache_dir(cache_dir)
                .with_show_download_progress(false),
        )
        .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;

        Ok(Self {
            model: Mutex::new(model),
        })
    }

    /// Embed a batch of texts. Returns one vector per input.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::EmbedFailed`] if inference fails.
    pub fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut model = self.model.lock().map_err(|_| EmbeddingError::Poisoned)?;
        model
            .embed(texts, None)
            .map_err(|e| EmbeddingError::EmbedFailed(e.to_string()))
    }
}

impl TextEmbedder for EmbeddingEngine {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut results = self.embed_batch(vec![text.to_string()])?;
        results.pop().ok_or(EmbeddingError::EmptyResult)
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::home_dir().map_or_else(
        || PathBuf::from(".fastembed_cache"),
        |h| h.join(".lexa").join("cache").join("fastembed"),
    )
}
