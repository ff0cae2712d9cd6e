//! Search error types for lex-search.

/// Errors from the retrieval tools and tool dispatch.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Error from the phrase index or citation graph.
    #[error("lake error: {0}")]
    Lake(#[from] lex_lake::LakeError),

    /// The model asked for a tool that is not in the catalogue.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Tool arguments did not match the tool's argument schema.
    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// Tool output could not be serialized into a return payload.
    #[error("failed to encode tool return: {0}")]
    Encode(#[from] serde_json::Error),
}
