//! Citations returned by the retrieval tools and checked citations produced by
//! verification.
//!
//! Fragment text is markdown: the act title is the level-1 heading, followed
//! by the part/section heading path and the body lines.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// First level-1 heading in a fragment; the act title.
static ACT_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^#[ \t]*([^#\s][^\n]*?)[ \t\r]*$").expect("act title pattern is valid")
});

/// A single markdown heading line.
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s*(.*?)\s*$").expect("heading pattern is valid"));

/// A piece of legislative text as surfaced to the model.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Citation {
    /// The citation reference identifier.
    pub reference: String,
    /// The text from the legal act, including heading and the main title.
    pub text: String,
}

impl Citation {
    /// A citation from any owned or borrowed strings.
    pub fn new(reference: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            text: text.into(),
        }
    }

    /// Title of the act this fragment belongs to, if the text carries one.
    #[must_use]
    pub fn act_title(&self) -> Option<&str> {
        ACT_TITLE
            .captures(&self.text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Heading path joined by `" / "`, then the body lines as a block quote.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut headings = Vec::new();
        let mut body = Vec::new();

        for line in self.text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match HEADING.captures(line) {
                Some(caps) => headings.push(caps.get(2).map_or("", |m| m.as_str())),
                None => body.push(format!("> {line}")),
            }
        }

        format!("{}\n\n{}", headings.join(" / "), body.join("\n"))
    }
}

/// A citation whose text was read back from the verification store.
///
/// Never built from model output: the model is not guaranteed to echo the
/// fragment text faithfully.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CheckedCitation {
    pub reference: String,
    pub text: String,
}

impl CheckedCitation {
    /// Text lines with every heading pushed down `levels` levels.
    #[must_use]
    pub fn demoted_text(&self, levels: usize) -> Vec<String> {
        demote_headings(&self.text, levels)
    }
}

/// Prefix every heading line with `levels` extra `#` markers.
///
/// Lines that do not start with `#` are returned untouched.
#[must_use]
pub fn demote_headings(text: &str, levels: usize) -> Vec<String> {
    let marker = "#".repeat(levels);
    text.lines()
        .map(|line| {
            if line.starts_with('#') {
                format!("{marker}{line}")
            } else {
                line.to_string()
            }
        })
        .collect()
}
