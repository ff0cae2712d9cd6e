use anyhow::Context;
use lex_config::LexConfig;
use lex_core::{LlmResult, ModelOutput};
use lex_verify::CheckedResult;

use crate::bootstrap;
use crate::cli::root_commands::VerifyArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output;

/// Handle `lexa verify`.
pub async fn handle(args: &VerifyArgs, config: &LexConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let answer = parse_answer(raw);

    let lake = bootstrap::open_lake(config, false)?;
    let checked = CheckedResult::from_model_output(&args.query, &answer, &*lake)
        .await
        .context("citation verification failed")?;

    match flags.format {
        OutputFormat::Text => {
            let document = checked.to_markdown(&bootstrap::markdown_style(&config.render));
            write_document(&document, args.out.as_deref())
        }
        OutputFormat::Json | OutputFormat::Raw => output::output(&checked, flags.format),
    }
}

/// A saved answer is a structured `LlmResult` when it parses as one, free text otherwise.
pub fn parse_answer(raw: String) -> ModelOutput {
    match serde_json::from_str::<LlmResult>(&raw) {
        Ok(result) => ModelOutput::Structured(result),
        Err(error) => {
            tracing::debug!(%error, "answer is not a structured result; treating as free text");
            ModelOutput::Text(raw)
        }
    }
}

/// Write the final document to `out`, or stdout when absent.
pub fn write_document(document: &str, out: Option<&std::path::Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => std::fs::write(path, document)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{document}");
            Ok(())
        }
    }
}
