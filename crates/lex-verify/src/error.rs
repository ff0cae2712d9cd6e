//! Verification error types.
//!
//! Store failures abort verification; everything wrong with the model's
//! answer itself is a [`CitationIssue`], recorded and rendered at the top of
//! the final document.

use serde::Serialize;

/// Errors that stop verification.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The verification store could not be queried.
    #[error("lake error: {0}")]
    Lake(#[from] lex_lake::LakeError),
}

/// A non-fatal problem with the model's answer.
///
/// `Display` is the line shown in the `# Errors` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "reference", rename_all = "snake_case")]
pub enum CitationIssue {
    /// Free text without the `---` separator between question and response.
    #[error("Cannot find advice.")]
    MissingResponse,

    /// A cited reference id is not in the verification store.
    #[error("Could not find citation: {0}")]
    CitationNotFound(String),

    /// No cited reference id could be verified.
    #[error("No valid citations found.")]
    NoValidCitations,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn issues_serialize_with_kind_tag() {
        assert_eq!(
            serde_json::to_value(CitationIssue::CitationNotFound("X1-1-1".to_string())).unwrap(),
            json!({"kind": "citation_not_found", "reference": "X1-1-1"})
        );
        assert_eq!(
            serde_json::to_value(CitationIssue::NoValidCitations).unwrap(),
            json!({"kind": "no_valid_citations"})
        );
    }
}
