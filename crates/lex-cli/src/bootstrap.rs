use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use lex_config::{LexConfig, RenderConfig};
use lex_embeddings::EmbeddingEngine;
use lex_lake::LegalLake;
use lex_search::RetrievalTools;
use lex_verify::MarkdownStyle;

use crate::cli::GlobalFlags;

pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<LexConfig> {
    let config = match &flags.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("failed to load dotenv file at {}", path.display()))?;
            LexConfig::load()
        }
        None => LexConfig::load_with_dotenv(),
    };
    config.context("failed to load lexa configuration")
}

/// Open the configured lake, creating its parent directory on first use.
///
/// The embedding model is only loaded when `embed` is set; it downloads on
/// first use and is not needed by graph traversal or verification.
pub fn open_lake(config: &LexConfig, embed: bool) -> anyhow::Result<Arc<LegalLake>> {
    let stores = &config.stores;
    let lake = if stores.is_in_memory() {
        LegalLake::open_in_memory()?
    } else {
        if let Some(parent) = Path::new(&stores.lake_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        LegalLake::open_local(&stores.lake_path)
            .with_context(|| format!("failed to open lake at {}", stores.lake_path))?
    };

    if !embed {
        return Ok(Arc::new(lake));
    }
    let engine = embedding_engine(config)?;
    Ok(Arc::new(lake.with_embedder(Arc::new(engine))))
}

pub fn embedding_engine(config: &LexConfig) -> anyhow::Result<EmbeddingEngine> {
    let cache = &config.stores.embedding_cache;
    let cache_dir = (!cache.is_empty()).then(|| PathBuf::from(cache));
    EmbeddingEngine::new(cache_dir).context("failed to initialize embedding model")
}

/// Retrieval tools over the lake, limited by `--limit` or the configured limits.
pub fn retrieval_tools(
    config: &LexConfig,
    flags: &GlobalFlags,
    lake: &Arc<LegalLake>,
) -> anyhow::Result<RetrievalTools> {
    let phrase_limit = flags.limit.unwrap_or(config.limits.phrase_limit);
    let link_limit = flags.limit.unwrap_or(config.limits.link_limit);
    anyhow::ensure!(phrase_limit > 0 && link_limit > 0, "--limit must be at least 1");

    Ok(RetrievalTools::new(lake.clone(), lake.clone()).with_limits(
        usize::try_from(phrase_limit).context("phrase limit out of range")?,
        usize::try_from(link_limit).context("link limit out of range")?,
    ))
}

pub fn markdown_style(render: &RenderConfig) -> MarkdownStyle {
    MarkdownStyle {
        css_class: render.css_class().map(ToString::to_string),
        demote_levels: render.demote_levels,
    }
}
