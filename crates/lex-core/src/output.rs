//! Terminal output of a research run, as handed over by the model driver.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::citation::Citation;

/// Structured answer requested from models that support typed output.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LlmResult {
    /// A clear redescription of the question being asked without losing the
    /// original intent.
    pub question: String,
    /// An informed response to the question.
    pub response: String,
    /// A list of citations used to generate the response.
    pub citations: Vec<Citation>,
}

/// Final model output: a structured [`LlmResult`] or free markdown text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ModelOutput {
    Structured(LlmResult),
    Text(String),
}

impl ModelOutput {
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }
}
