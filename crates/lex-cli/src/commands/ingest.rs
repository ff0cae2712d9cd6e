use std::path::Path;

use anyhow::Context;
use lex_config::LexConfig;
use lex_embeddings::EmbeddingEngine;
use lex_lake::{ChildOfRow, FragmentRow, LegalLake, PhraseRow, RefersToRow};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::bootstrap;
use crate::cli::root_commands::IngestArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output;

/// Rows loaded per table.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct IngestReport {
    pub phrases: usize,
    pub embedded: usize,
    pub fragments: usize,
    pub sections: usize,
    pub refers_to: usize,
    pub child_of: usize,
}

/// Handle `lexa ingest`.
pub fn handle(args: &IngestArgs, config: &LexConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let lake = bootstrap::open_lake(config, false)?;
    let engine = if args.embed {
        Some(bootstrap::embedding_engine(config)?)
    } else {
        None
    };

    let report = ingest(args, &lake, engine.as_ref())?;
    tracing::info!(?report, "ingest complete");

    match flags.format {
        OutputFormat::Text => {
            println!(
                "phrases: {} ({} embedded)\nfragments: {}\nsections: {}\nrefers_to: {}\nchild_of: {}",
                report.phrases,
                report.embedded,
                report.fragments,
                report.sections,
                report.refers_to,
                report.child_of
            );
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Raw => output::output(&report, flags.format),
    }
}

/// Load every table named in `args`. Phrases without an embedding are
/// embedded first when an engine is supplied.
pub fn ingest(
    args: &IngestArgs,
    lake: &LegalLake,
    engine: Option<&EmbeddingEngine>,
) -> anyhow::Result<IngestReport> {
    let mut report = IngestReport::default();

    if let Some(path) = &args.phrases {
        let mut rows: Vec<PhraseRow> = read_rows(path)?;
        if let Some(engine) = engine {
            report.embedded = embed_missing(&mut rows, engine)?;
        }
        lake.store_phrases(&rows).context("failed to store phrases")?;
        report.phrases = rows.len();
    }
    if let Some(path) = &args.fragments {
        let rows: Vec<FragmentRow> = read_rows(path)?;
        lake.store_fragments(&rows).context("failed to store fragments")?;
        report.fragments = rows.len();
    }
    if let Some(path) = &args.sections {
        let names: Vec<String> = read_rows(path)?;
        lake.store_sections(&names).context("failed to store sections")?;
        report.sections = names.len();
    }
    if let Some(path) = &args.refers_to {
        let rows: Vec<RefersToRow> = read_rows(path)?;
        lake.store_refers_to(&rows).context("failed to store refers_to edges")?;
        report.refers_to = rows.len();
    }
    if let Some(path) = &args.child_of {
        let rows: Vec<ChildOfRow> = read_rows(path)?;
        lake.store_child_of(&rows).context("failed to store child_of edges")?;
        report.child_of = rows.len();
    }

    Ok(report)
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    serde_jsonlines::json_lines::<T, _>(path)
        .and_then(|lines| lines.collect::<std::io::Result<Vec<T>>>())
        .with_context(|| format!("failed to read {}", path.display()))
}

/// Embed the phrase of every row that has no vector yet.
fn embed_missing(rows: &mut [PhraseRow], engine: &EmbeddingEngine) -> anyhow::Result<usize> {
    let pending: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.embedding.is_empty())
        .map(|(index, _)| index)
        .collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let texts = pending
        .iter()
        .map(|&index| {
            let row = &rows[index];
            if row.phrase.is_empty() { row.text.clone() } else { row.phrase.clone() }
        })
        .collect();
    let vectors = engine.embed_batch(texts).context("failed to embed phrases")?;

    for (index, vector) in pending.iter().zip(vectors) {
        rows[*index].embedding = vector;
    }
    Ok(pending.len())
}
