use lex_core::Citation;
use serde::Serialize;

use crate::cli::OutputFormat;

/// Render a serializable response as JSON. `Text` callers render their own
/// markdown and only reach this for values without a text form.
pub fn render_json<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json | OutputFormat::Text => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested JSON flavour.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render_json(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Citations as markdown: an id heading, the heading path, the quoted body.
pub fn citations_markdown(citations: &[Citation]) -> String {
    if citations.is_empty() {
        return String::from("(no citations)");
    }
    citations
        .iter()
        .map(|citation| format!("## {}\n{}", citation.reference, citation.summary()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Print citations in the requested format.
pub fn citations(citations: &[Citation], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{}", citations_markdown(citations));
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Raw => output(&citations, format),
    }
}
