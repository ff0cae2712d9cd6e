use std::path::Path;

use anyhow::Context;
use futures_util::StreamExt;
use lex_agent::{AgentEvent, AgentRunner, OngoingResult, RunError, run_events};
use lex_config::LexConfig;

use crate::bootstrap;
use crate::cli::root_commands::ReplayArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::verify::write_document;
use crate::output;

/// Handle `lexa replay`.
pub async fn handle(args: &ReplayArgs, config: &LexConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let events = read_events(&args.events)?;
    let lake = bootstrap::open_lake(config, false)?;
    let runner = AgentRunner::new(args.query.clone())
        .with_style(bootstrap::markdown_style(&config.render));

    let progress = run_events(runner, futures_util::stream::iter(events), lake);
    let mut progress = std::pin::pin!(progress);

    let mut final_text = None;
    while let Some(snapshot) = progress.next().await {
        let snapshot = snapshot.context("research run failed")?;
        match flags.format {
            OutputFormat::Text => print_progress(&snapshot),
            OutputFormat::Json | OutputFormat::Raw => output::output(&snapshot, flags.format)?,
        }
        if snapshot.complete {
            final_text = Some(snapshot.final_text);
        }
    }

    let Some(document) = final_text else {
        anyhow::bail!("transcript ended before the run completed");
    };
    match (&args.out, flags.format) {
        (Some(out), _) => write_document(&document, Some(out.as_path())),
        (None, OutputFormat::Text) => write_document(&document, None),
        (None, _) => Ok(()),
    }
}

/// Decode a JSONL transcript. A malformed line surfaces as an upstream
/// failure when the run reaches it, after the snapshots before it.
fn read_events(path: &Path) -> anyhow::Result<Vec<Result<AgentEvent, RunError>>> {
    let lines = serde_jsonlines::json_lines::<AgentEvent, _>(path)
        .with_context(|| format!("failed to open transcript {}", path.display()))?;

    Ok(lines
        .enumerate()
        .map(|(index, event)| {
            event.map_err(|error| RunError::Upstream(format!("transcript line {}: {error}", index + 1)))
        })
        .collect())
}

fn print_progress(snapshot: &OngoingResult) {
    if !snapshot.logging.is_empty() {
        println!("{}", snapshot.logging);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn malformed_line_becomes_an_upstream_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"kind": "user_prompt", "prompt": "q"}}"#).unwrap();
        writeln!(file, r#"{{"kind": "teleport"}}"#).unwrap();
        file.flush().unwrap();

        let events = read_events(file.path()).unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], Ok(AgentEvent::UserPrompt { prompt }) if prompt == "q"));
        assert!(matches!(&events[1], Err(RunError::Upstream(msg)) if msg.starts_with("transcript line 2:")));
    }

    #[test]
    fn missing_transcript_is_reported() {
        let error = read_events(Path::new("/nonexistent/run.jsonl")).unwrap_err();
        assert!(format!("{error:#}").contains("failed to open transcript"));
    }
}
