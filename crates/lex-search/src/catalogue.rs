//! Model-facing tool catalogue.
//!
//! An LLM driver advertises [`tool_definitions`] to the model, then hands each
//! tool call it receives to [`RetrievalTools::dispatch`]. The JSON payload
//! returned is what the run loop later sees as the tool return.

use std::fmt;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SearchError;
use crate::tools::RetrievalTools;

/// Names of the tools the model can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    GetLegislation,
    GetLinked,
    GetReferrers,
}

impl ToolName {
    pub const ALL: [Self; 3] = [Self::GetLegislation, Self::GetLinked, Self::GetReferrers];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetLegislation => "get_legislation",
            Self::GetLinked => "get_linked",
            Self::GetReferrers => "get_referrers",
        }
    }

    /// Look up a tool by its model-facing name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }

    const fn description(self) -> &'static str {
        match self {
            Self::GetLegislation => "Use a semantic lookup for legislation based on a phrase.",
            Self::GetLinked => {
                "Use the citation graph to find legislation linked from the given reference id."
            }
            Self::GetReferrers => {
                "Use the citation graph to find all legal text that refers to the given reference id."
            }
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments of `get_legislation`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LegislationArgs {
    /// A phrase describing the legislation to look for.
    pub query: String,
}

/// Arguments of `get_linked` and `get_referrers`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReferenceArgs {
    /// Reference id of a fragment returned by an earlier tool call.
    pub reference_id: String,
}

/// One advertised tool: name, description and JSON schema of its arguments.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

/// Definitions of every tool, in catalogue order.
///
/// # Errors
///
/// Returns [`SearchError::Encode`] if a schema cannot be converted to JSON.
pub fn tool_definitions() -> Result<Vec<ToolDefinition>, SearchError> {
    ToolName::ALL
        .into_iter()
        .map(|tool| {
            let schema = match tool {
                ToolName::GetLegislation => schemars::schema_for!(LegislationArgs),
                ToolName::GetLinked | ToolName::GetReferrers => {
                    schemars::schema_for!(ReferenceArgs)
                }
            };
            Ok(ToolDefinition {
                name: tool.as_str(),
                description: tool.description(),
                parameters: serde_json::to_value(schema)?,
            })
        })
        .collect()
}

fn decode_args<T: DeserializeOwned>(
    tool: ToolName,
    args: &Map<String, Value>,
) -> Result<T, SearchError> {
    serde_json::from_value(Value::Object(args.clone())).map_err(|e| {
        SearchError::InvalidArguments {
            tool: tool.as_str().to_string(),
            reason: e.to_string(),
        }
    })
}

impl RetrievalTools {
    /// Execute one tool call and return its JSON payload: a list of citations.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnknownTool`] for a name outside the catalogue,
    /// [`SearchError::InvalidArguments`] if `args` do not fit the tool, or the
    /// error of the underlying lookup.
    pub async fn dispatch(&self, name: &str, args: &Map<String, Value>) -> Result<Value, SearchError> {
        let tool = ToolName::parse(name).ok_or_else(|| SearchError::UnknownTool(name.to_string()))?;
        tracing::debug!(tool = tool.as_str(), "dispatching tool call");

        let citations = match tool {
            ToolName::GetLegislation => {
                let LegislationArgs { query } = decode_args(tool, args)?;
                self.semantic_lookup(&query, self.phrase_limit).await?
            }
            ToolName::GetLinked => {
                let ReferenceArgs { reference_id } = decode_args(tool, args)?;
                self.linked_lookup(&reference_id, self.link_limit).await?
            }
            ToolName::GetReferrers => {
                let ReferenceArgs { reference_id } = decode_args(tool, args)?;
                self.referrer_lookup(&reference_id, self.link_limit).await?
            }
        };

        Ok(serde_json::to_value(citations)?)
    }
}
