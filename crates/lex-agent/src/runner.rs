//! The research run loop.
//!
//! [`AgentRunner`] consumes the driver's events one at a time and turns each
//! meaningful one into an [`OngoingResult`] snapshot. It owns the two pieces
//! of run-scoped state: the registry of citations the model has seen, and the
//! tool calls still waiting for their return.

use std::collections::HashMap;

use lex_core::{Citation, ModelOutput};
use lex_lake::CitationLookup;
use lex_verify::{CheckedResult, MarkdownStyle};
use serde::Serialize;
use serde_json::Value;

use crate::args::normalize_args;
use crate::error::RunError;
use crate::events::{AgentEvent, RequestPart, ResponsePart, ToolArgs};
use crate::registry::ReferenceRegistry;
use crate::render;

/// Where the run stands between two events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Start,
    AwaitingModel,
    ToolCallEmitted,
    ToolReturnProcessed,
    Completed,
}

/// A progress snapshot. Only the final one has `complete` set, and only it
/// carries `final_text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OngoingResult {
    pub logging: String,
    pub summary: String,
    #[serde(rename = "final")]
    pub final_text: String,
    pub complete: bool,
}

/// A tool call waiting for its return.
#[derive(Debug)]
struct ToolCallRecord {
    tool_name: String,
    narrative: Vec<String>,
}

/// State machine for one research run, fed one driver event at a time.
pub struct AgentRunner {
    query: String,
    style: MarkdownStyle,
    state: RunState,
    registry: ReferenceRegistry,
    pending: HashMap<String, ToolCallRecord>,
}

impl AgentRunner {
    /// A fresh run for `query`, rendering with the default markdown style.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            style: MarkdownStyle::default(),
            state: RunState::Start,
            registry: ReferenceRegistry::new(),
            pending: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: MarkdownStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    #[must_use]
    pub const fn registry(&self) -> &ReferenceRegistry {
        &self.registry
    }

    /// Number of tool calls still waiting for a return.
    #[must_use]
    pub fn pending_calls(&self) -> usize {
        self.pending.len()
    }

    /// Process one event and return the snapshots it produces, in order.
    ///
    /// Most events produce one snapshot; a model request produces one per tool
    /// return it carries, and events with nothing to report produce none.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] for undecodable tool-call arguments, a tool return
    /// that is not a citation list, a tool return without a pending call, an
    /// event after completion, or a failed store lookup during verification.
    pub async fn handle(
        &mut self,
        event: AgentEvent,
        store: &dyn CitationLookup,
    ) -> Result<Vec<OngoingResult>, RunError> {
        if self.state == RunState::Completed {
            return Err(RunError::AfterCompletion);
        }
        tracing::debug!(event = event.name(), state = ?self.state, "run event");

        match event {
            AgentEvent::UserPrompt { prompt } => Ok(vec![self.on_user_prompt(&prompt)]),
            AgentEvent::ModelRequest { parts } => self.on_model_request(parts),
            AgentEvent::CallTools { parts } => Ok(self.on_call_tools(parts)?.into_iter().collect()),
            AgentEvent::End { output } => Ok(vec![self.on_end(&output, store).await?]),
        }
    }

    fn snapshot(&self, logging: String) -> OngoingResult {
        OngoingResult {
            logging,
            summary: self.registry.summary(),
            ..OngoingResult::default()
        }
    }

    fn on_user_prompt(&mut self, prompt: &str) -> OngoingResult {
        tracing::info!(query = %self.query, "research run started");
        self.state = RunState::AwaitingModel;
        self.snapshot(render::intro(prompt))
    }

    fn on_model_request(&mut self, parts: Vec<RequestPart>) -> Result<Vec<OngoingResult>, RunError> {
        let mut snapshots = Vec::new();
        for part in parts {
            match part {
                RequestPart::ToolReturn {
                    tool_name,
                    tool_call_id,
                    content,
                } => {
                    let card = self.on_tool_return(&tool_name, tool_call_id, content)?;
                    snapshots.push(self.snapshot(card));
                }
                RequestPart::Other => tracing::trace!("skipped non tool-return request part"),
            }
        }

        self.state = if snapshots.is_empty() {
            RunState::AwaitingModel
        } else {
            RunState::ToolReturnProcessed
        };
        Ok(snapshots)
    }

    fn on_tool_return(
        &mut self,
        tool_name: &str,
        tool_call_id: String,
        content: Value,
    ) -> Result<String, RunError> {
        let citations: Vec<Citation> =
            serde_json::from_value(content).map_err(|e| RunError::ToolReturnType {
                tool_call_id: tool_call_id.clone(),
                reason: e.to_string(),
            })?;

        let Some(record) = self.pending.remove(&tool_call_id) else {
            return Err(RunError::OrphanToolReturn { tool_call_id });
        };
        if record.tool_name != tool_name {
            tracing::warn!(
                call_id = %tool_call_id,
                called = %record.tool_name,
                returned = tool_name,
                "tool return names a different tool than its call"
            );
        }

        let tallies = render::tally_titles(&citations);
        let found = citations.len();
        for cite in citations {
            self.registry.insert(cite);
        }

        tracing::debug!(
            tool = tool_name,
            call_id = %tool_call_id,
            rows = found,
            registry = self.registry.len(),
            "tool return processed"
        );
        Ok(render::return_card(&record.narrative, found, &tallies))
    }

    fn on_call_tools(&mut self, parts: Vec<ResponsePart>) -> Result<Option<OngoingResult>, RunError> {
        let mut text = None;
        let mut calls = Vec::new();
        for part in parts {
            match part {
                ResponsePart::Text { content } => text = Some(content),
                ResponsePart::ToolCall {
                    tool_name,
                    tool_call_id,
                    args,
                } => calls.push((tool_name, tool_call_id, args)),
                ResponsePart::Other => tracing::trace!("skipped non tool-call response part"),
            }
        }

        if calls.is_empty() {
            tracing::trace!("model response without tool calls");
            return Ok(None);
        }

        for (tool_name, tool_call_id, args) in calls {
            self.record_call(tool_name, tool_call_id, args.as_ref())?;
        }
        self.state = RunState::ToolCallEmitted;
        Ok(Some(self.snapshot(render::tool_call_log(text.as_deref()))))
    }

    fn record_call(
        &mut self,
        tool_name: String,
        tool_call_id: String,
        args: Option<&ToolArgs>,
    ) -> Result<(), RunError> {
        let args = normalize_args(args).map_err(|source| RunError::ArgumentDecode {
            tool_call_id: tool_call_id.clone(),
            source,
        })?;
        let narrative = render::narrative(&tool_name, &args, &self.registry);

        tracing::debug!(tool = %tool_name, call_id = %tool_call_id, "tool call recorded");
        if self
            .pending
            .insert(tool_call_id.clone(), ToolCallRecord { tool_name, narrative })
            .is_some()
        {
            tracing::warn!(call_id = %tool_call_id, "tool call id reused before its return");
        }
        Ok(())
    }

    async fn on_end(
        &mut self,
        output: &ModelOutput,
        store: &dyn CitationLookup,
    ) -> Result<OngoingResult, RunError> {
        for (call_id, record) in self.pending.drain() {
            tracing::warn!(
                call_id = %call_id,
                tool = %record.tool_name,
                "tool call never returned before the run ended"
            );
        }

        let checked = CheckedResult::from_model_output(&self.query, output, store).await?;
        self.state = RunState::Completed;
        tracing::info!(
            query = %self.query,
            registry = self.registry.len(),
            citations = checked.citations.len(),
            "research run completed"
        );

        Ok(OngoingResult {
            final_text: checked.to_markdown(&self.style),
            complete: true,
            ..OngoingResult::default()
        })
    }
}
