//! Markdown fragments shown to the user while research is in progress.

use lex_core::Citation;
use lex_search::ToolName;
use serde_json::{Map, Value};

use crate::args::arg_text;
use crate::registry::ReferenceRegistry;

/// Label for citations whose text carries no act title.
pub const UNTITLED: &str = "Untitled";

/// Introduction shown for the user's question.
#[must_use]
pub fn intro(prompt: &str) -> String {
    format!("### Beginning Research\n\nI'm considering the question: \n> **{prompt}**\n")
}

/// Log line for a model response that made tool calls.
#[must_use]
pub fn tool_call_log(text: Option<&str>) -> String {
    text.map_or_else(
        || "\n<div class='request'>Requesting information...</div>\n".to_string(),
        |text| format!("\n{text}\n"),
    )
}

/// Narrative describing what a tool call is about to do.
///
/// Graph lookups resolve the reference id against the citations already
/// shown; an id the model was never given is reported as an invalid link.
#[must_use]
pub fn narrative(tool_name: &str, args: &Map<String, Value>, registry: &ReferenceRegistry) -> Vec<String> {
    let Some(tool) = ToolName::parse(tool_name) else {
        return vec![format!("### Used {tool_name}\n")];
    };

    if tool == ToolName::GetLegislation {
        return vec![
            "### Searched Acts\n".to_string(),
            "Looking for text related to:\n".to_string(),
            format!("> **{}**", arg_text(args, "query")),
        ];
    }

    let reference = arg_text(args, "reference_id");
    let Some(cite) = registry.get(&reference) else {
        return vec![format!("The given link {reference} appears invalid...")];
    };

    let (heading, lead) = if tool == ToolName::GetLinked {
        ("### Followed links\n", "Looked for links found in\n")
    } else {
        (
            "### Followed Referrers\n",
            "Looking for any passages that reference this text:\n",
        )
    };
    vec![heading.to_string(), lead.to_string(), cite.summary()]
}

/// Per-act-title counts of a tool return, in first-seen order.
#[must_use]
pub fn tally_titles(citations: &[Citation]) -> Vec<(String, usize)> {
    let mut tallies: Vec<(String, usize)> = Vec::new();
    for cite in citations {
        let title = cite.act_title().unwrap_or(UNTITLED);
        match tallies.iter_mut().find(|(t, _)| t == title) {
            Some((_, count)) => *count += 1,
            None => tallies.push((title.to_string(), 1)),
        }
    }
    tallies
}

/// The card closing a tool call: its narrative, then what came back.
#[must_use]
pub fn return_card(narrative: &[String], found: usize, tallies: &[(String, usize)]) -> String {
    let mut md = narrative.concat();
    md.push_str(&format!("\n\n#### {found} References found\n"));
    if tallies.is_empty() {
        md.push_str("No references found!\n");
    } else {
        for (title, count) in tallies {
            md.push_str(&format!("- {title} ({count})\n"));
        }
    }
    md
}
