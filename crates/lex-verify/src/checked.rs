//! Verification of the model's final answer against the citation store.

use std::collections::HashSet;

use lex_core::{CheckedCitation, LlmResult, ModelOutput, find_references};
use lex_lake::CitationLookup;
use serde::Serialize;

use crate::error::{CitationIssue, VerifyError};
use crate::links::format_links;

/// Separates the question preamble from the response in a free-text answer.
pub const RESPONSE_DELIMITER: &str = "---";

/// The terminal artifact of a research run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckedResult {
    /// The user's original query.
    pub query: String,
    pub question: String,
    /// Response text, with reference ids rewritten as anchor links.
    pub response: String,
    pub errors: Vec<CitationIssue>,
    /// Verified citations in first-cited order.
    pub citations: Vec<CheckedCitation>,
    pub was_structured: bool,
}

impl CheckedResult {
    /// Verify a terminal model output and link-format its response.
    ///
    /// Structured output cites its references explicitly; free text is scanned
    /// for reference ids and split on [`RESPONSE_DELIMITER`].
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Lake`] if a store lookup fails. Problems with
    /// the answer itself are recorded in [`CheckedResult::errors`].
    pub async fn from_model_output(
        query: &str,
        output: &ModelOutput,
        store: &dyn CitationLookup,
    ) -> Result<Self, VerifyError> {
        let mut checked = match output {
            ModelOutput::Structured(result) => Self::from_structured(query, result, store).await?,
            ModelOutput::Text(text) => Self::from_text(query, text, store).await?,
        };
        checked.response = format_links(&checked.response);

        tracing::info!(
            query,
            citations = checked.citations.len(),
            errors = checked.errors.len(),
            structured = checked.was_structured,
            "verified final answer"
        );
        Ok(checked)
    }

    async fn from_structured(
        query: &str,
        result: &LlmResult,
        store: &dyn CitationLookup,
    ) -> Result<Self, VerifyError> {
        let ids = result.citations.iter().map(|c| c.reference.as_str());
        let (citations, errors) = check_references(ids, store).await?;

        Ok(Self {
            query: query.to_string(),
            question: result.question.clone(),
            response: result.response.clone(),
            errors,
            citations,
            was_structured: true,
        })
    }

    async fn from_text(
        query: &str,
        text: &str,
        store: &dyn CitationLookup,
    ) -> Result<Self, VerifyError> {
        let ids = find_references(text).map(|m| m.as_str());
        let (citations, mut errors) = check_references(ids, store).await?;

        let (question, response) = match text.split_once(RESPONSE_DELIMITER) {
            Some((question, response)) => (question.trim().to_string(), response.to_string()),
            None => {
                tracing::warn!(issue = %CitationIssue::MissingResponse, "answer has no response section");
                errors.push(CitationIssue::MissingResponse);
                (text.trim().to_string(), String::new())
            }
        };

        Ok(Self {
            query: query.to_string(),
            question,
            response,
            errors,
            citations,
            was_structured: false,
        })
    }

    /// The error lines as rendered in the `# Errors` block.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Look up each distinct reference id once, in first-seen order.
///
/// Found ids become [`CheckedCitation`]s carrying the store's text; missing
/// ids are reported individually, and an empty result adds
/// [`CitationIssue::NoValidCitations`].
///
/// # Errors
///
/// Returns [`VerifyError::Lake`] if a lookup fails.
pub async fn check_references<'a>(
    ids: impl IntoIterator<Item = &'a str>,
    store: &dyn CitationLookup,
) -> Result<(Vec<CheckedCitation>, Vec<CitationIssue>), VerifyError> {
    let mut seen = HashSet::new();
    let unique: Vec<&str> = ids.into_iter().filter(|id| seen.insert(*id)).collect();

    let mut citations = Vec::new();
    let mut errors = Vec::new();
    for reference in unique {
        match store.find_citation(reference).await? {
            Some(stored) => citations.push(CheckedCitation {
                reference: reference.to_string(),
                text: stored.text,
            }),
            None => {
                tracing::warn!(reference_id = reference, "cited reference not found");
                errors.push(CitationIssue::CitationNotFound(reference.to_string()));
            }
        }
    }

    if citations.is_empty() {
        tracing::warn!("no cited reference could be verified");
        errors.push(CitationIssue::NoValidCitations);
    }
    Ok((citations, errors))
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use lex_lake::{CitationLookup, LakeError, StoredText};

    /// In-memory citation store that counts lookups per id.
    #[derive(Default)]
    pub struct MemoryStore {
        texts: HashMap<String, String>,
        pub lookups: Mutex<Vec<String>>,
    }

    impl MemoryStore {
        pub fn with(entries: &[(&str, &str)]) -> Self {
            Self {
                texts: entries
                    .iter()
                    .map(|(id, text)| ((*id).to_string(), (*text).to_string()))
                    .collect(),
                lookups: Mutex::default(),
            }
        }

        pub fn lookup_count(&self) -> usize {
            self.lookups.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CitationLookup for MemoryStore {
        async fn find_citation(&self, reference: &str) -> Result<Option<StoredText>, LakeError> {
            self.lookups.lock().unwrap().push(reference.to_string());
            Ok(self.texts.get(reference).map(|text| StoredText {
                id: reference.to_string(),
                text: text.clone(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use lex_core::Citation;
    use pretty_assertions::assert_eq;

    use super::fakes::MemoryStore;
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::with(&[
            ("CA1961-160-1", "# Crimes Act 1961\n## 160 Culpable homicide\nstore text"),
            ("SA2002-8-1", "# Sentencing Act 2002\n## 8 Principles\nstore text"),
            ("X1-1-1", "# X Act\nx"),
        ])
    }

    fn structured(ids: &[&str]) -> ModelOutput {
        ModelOutput::Structured(LlmResult {
            question: "Is it homicide?".to_string(),
            response: format!("Yes, see {}.", ids.join(" and ")),
            citations: ids
                .iter()
                .map(|id| Citation::new(*id, "model-echoed text"))
                .collect(),
        })
    }

    #[tokio::test]
    async fn duplicate_structured_citation_is_checked_once() {
        let store = store();
        let result = CheckedResult::from_model_output("q", &structured(&["X1-1-1", "X1-1-1"]), &store)
            .await
            .unwrap();

        assert_eq!(result.citations.len(), 1);
        assert_eq!(store.lookup_count(), 1);
        assert!(result.errors.is_empty());
    }

    #[tokio::test]
    async fn checked_text_comes_from_the_store() {
        let result =
            CheckedResult::from_model_output("q", &structured(&["CA1961-160-1"]), &store())
                .await
                .unwrap();

        assert_eq!(
            result.citations[0].text,
            "# Crimes Act 1961\n## 160 Culpable homicide\nstore text"
        );
    }

    #[tokio::test]
    async fn two_valid_and_one_invalid() {
        let output = structured(&["CA1961-160-1", "NOPE9-9-9", "SA2002-8-1"]);
        let result = CheckedResult::from_model_output("What is homicide?", &output, &store())
            .await
            .unwrap();

        let refs: Vec<&str> = result.citations.iter().map(|c| c.reference.as_str()).collect();
        assert_eq!(refs, vec!["CA1961-160-1", "SA2002-8-1"]);
        assert_eq!(result.error_messages(), vec!["Could not find citation: NOPE9-9-9"]);
        assert!(result.was_structured);
        assert_eq!(result.query, "What is homicide?");
    }

    #[tokio::test]
    async fn no_valid_citations_is_recorded() {
        let result = CheckedResult::from_model_output("q", &structured(&[]), &store())
            .await
            .unwrap();
        assert_eq!(result.errors, vec![CitationIssue::NoValidCitations]);
    }

    #[tokio::test]
    async fn free_text_splits_on_first_delimiter() {
        let text = "  Is it homicide?  \n---\nYes, see CA1961-160-1.\n---\nMore.";
        let result = CheckedResult::from_model_output("q", &ModelOutput::Text(text.to_string()), &store())
            .await
            .unwrap();

        assert_eq!(result.question, "Is it homicide?");
        assert_eq!(
            result.response,
            "\nYes, see [CA1961-160-1](#ca-1961-160-1).\n---\nMore."
        );
        assert!(!result.was_structured);
        assert!(result.errors.is_empty());
    }

    #[tokio::test]
    async fn free_text_without_delimiter() {
        let text = "  All question, citing CA1961-160-1  ";
        let result = CheckedResult::from_model_output("q", &ModelOutput::Text(text.to_string()), &store())
            .await
            .unwrap();

        assert_eq!(result.question, "All question, citing CA1961-160-1");
        assert_eq!(result.response, "");
        assert_eq!(result.errors, vec![CitationIssue::MissingResponse]);
        assert_eq!(result.citations.len(), 1);
    }

    #[tokio::test]
    async fn free_text_references_checked_in_first_seen_order() {
        let store = store();
        let text = "Q\n---\nSA2002-8-1, CA1961-160-1, SA2002-8-1, ZZ1-1-1";
        let result = CheckedResult::from_model_output("q", &ModelOutput::Text(text.to_string()), &store)
            .await
            .unwrap();

        assert_eq!(
            *store.lookups.lock().unwrap(),
            vec!["SA2002-8-1", "CA1961-160-1", "ZZ1-1-1"]
        );
        assert_eq!(result.error_messages(), vec!["Could not find citation: ZZ1-1-1"]);
    }

    #[tokio::test]
    async fn missing_response_follows_lookup_errors() {
        let result = CheckedResult::from_model_output(
            "q",
            &ModelOutput::Text("nothing to cite".to_string()),
            &store(),
        )
        .await
        .unwrap();

        assert_eq!(
            result.error_messages(),
            vec!["No valid citations found.", "Cannot find advice."]
        );
    }
}
