//! Markdown assembly of a [`CheckedResult`].

use crate::checked::CheckedResult;

/// How the citations block is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownStyle {
    /// CSS class of the `<div>` wrapping each citation; `None` separates
    /// citations with a `---` rule instead.
    pub css_class: Option<String>,
    /// Heading levels added to citation text so it nests under `## {id}`.
    pub demote_levels: usize,
}

impl Default for MarkdownStyle {
    fn default() -> Self {
        Self {
            css_class: Some("legal_ref".to_string()),
            demote_levels: 2,
        }
    }
}

impl CheckedResult {
    /// Question and response, preceded by an `# Errors` block if any were recorded.
    #[must_use]
    pub fn response_markdown(&self) -> String {
        let text = if self.was_structured {
            [
                "# Question",
                self.question.as_str(),
                "---\n# Response",
                self.response.as_str(),
            ]
            .join("\n\n")
        } else {
            [self.question.as_str(), "---", self.response.as_str()].join("\n")
        };

        if self.errors.is_empty() {
            return text;
        }

        let mut block = vec!["# Errors".to_string()];
        block.extend(self.errors.iter().map(|e| format!("- {e}")));
        block.push("---".to_string());
        format!("{}\n\n{text}", block.join("\n\n"))
    }

    /// One section per checked citation: `## {id}` then its demoted text.
    #[must_use]
    pub fn references_markdown(&self, style: &MarkdownStyle) -> String {
        let css_class = style.css_class.as_deref().filter(|c| !c.is_empty());

        let mut lines = Vec::new();
        for citation in &self.citations {
            match css_class {
                Some(class) => lines.push(format!("\n<div class='{class}'>\n")),
                None => lines.push("---".to_string()),
            }
            lines.push(format!("## {}", citation.reference));
            lines.extend(citation.demoted_text(style.demote_levels));
            if css_class.is_some() {
                lines.push("</div>\n".to_string());
            }
        }
        lines.join("\n")
    }

    /// The final document: response block, blank line, citations block.
    #[must_use]
    pub fn to_markdown(&self, style: &MarkdownStyle) -> String {
        format!(
            "{}\n\n{}",
            self.response_markdown(),
            self.references_markdown(style)
        )
    }
}
