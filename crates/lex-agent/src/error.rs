//! Run-loop error types.
//!
//! Every variant aborts the run. Problems with the final answer that still
//! allow a best-effort document are [`lex_verify::CitationIssue`]s instead.

use crate::literal::LiteralError;

/// Why a tool call's arguments could not be normalized into a mapping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgsError {
    /// The tool call carried no arguments at all.
    #[error("tool call has no arguments")]
    Missing,

    /// The arguments decoded, but not to a mapping.
    #[error("arguments decode to {0}, expected a mapping")]
    NotAMapping(&'static str),

    /// Neither the JSON nor the literal decoder accepted the text.
    #[error("not JSON ({json}) and not a literal ({literal})")]
    Undecodable { json: String, literal: LiteralError },
}

/// Fatal errors of a research run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Tool-call arguments unparsable by either decode strategy.
    #[error("cannot decode arguments of tool call {tool_call_id}: {source}")]
    ArgumentDecode {
        tool_call_id: String,
        #[source]
        source: ArgsError,
    },

    /// A tool return whose payload is not a list of citations.
    #[error("tool return for call {tool_call_id} is not a list of citations: {reason}")]
    ToolReturnType { tool_call_id: String, reason: String },

    /// A tool return whose call id has no pending tool call.
    #[error("tool return for call {tool_call_id} matches no pending tool call")]
    OrphanToolReturn { tool_call_id: String },

    /// An event arrived after the run had already completed.
    #[error("event received after the run completed")]
    AfterCompletion,

    /// Verification of the final answer failed against the store.
    #[error("verification failed: {0}")]
    Verify(#[from] lex_verify::VerifyError),

    /// The event source (the model driver) failed.
    #[error("event source failed: {0}")]
    Upstream(String),
}
