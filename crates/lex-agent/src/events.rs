//! Events driving a research run, in the order the model driver produces them.
//!
//! The wire shape follows the driver's message parts: a `kind` tag on each
//! event and a `part_kind` tag on each part. Part kinds the run loop does not
//! act on (system prompts, retries, thinking) decode to `Other`.

use lex_core::ModelOutput;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentEvent {
    /// The user's question, before the first model request.
    UserPrompt { prompt: String },
    /// A request sent to the model; carries tool returns after the first turn.
    ModelRequest { parts: Vec<RequestPart> },
    /// A model response; carries tool calls while research continues.
    CallTools { parts: Vec<ResponsePart> },
    /// The run finished with a terminal output.
    End { output: ModelOutput },
}

impl AgentEvent {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UserPrompt { .. } => "user_prompt",
            Self::ModelRequest { .. } => "model_request",
            Self::CallTools { .. } => "call_tools",
            Self::End { .. } => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "part_kind", rename_all = "kebab-case")]
pub enum RequestPart {
    ToolReturn {
        tool_name: String,
        tool_call_id: String,
        content: Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "part_kind", rename_all = "kebab-case")]
pub enum ResponsePart {
    Text {
        content: String,
    },
    ToolCall {
        tool_name: String,
        tool_call_id: String,
        #[serde(default)]
        args: Option<ToolArgs>,
    },
    #[serde(other)]
    Other,
}

/// Tool-call arguments as the model produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolArgs {
    /// Already a mapping; passed through unchanged.
    Structured(Map<String, Value>),
    /// Encoded text, decoded at the boundary.
    Text(String),
}
