use anyhow::Context;
use lex_config::LexConfig;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::{ReferenceArgs, SearchArgs};
use crate::output;

/// Handle `lexa search`.
pub async fn handle_search(
    args: &SearchArgs,
    config: &LexConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let lake = bootstrap::open_lake(config, true)?;
    let tools = bootstrap::retrieval_tools(config, flags, &lake)?;
    let citations = tools
        .semantic_lookup(&args.query, tools.phrase_limit)
        .await
        .context("semantic lookup failed")?;
    output::citations(&citations, flags.format)
}

/// Handle `lexa linked`.
pub async fn handle_linked(
    args: &ReferenceArgs,
    config: &LexConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let reference_id = checked_reference(&args.reference_id)?;
    let lake = bootstrap::open_lake(config, false)?;
    let tools = bootstrap::retrieval_tools(config, flags, &lake)?;
    let citations = tools
        .linked_lookup(reference_id, tools.link_limit)
        .await
        .with_context(|| format!("linked lookup for {reference_id} failed"))?;
    output::citations(&citations, flags.format)
}

/// Handle `lexa referrers`.
pub async fn handle_referrers(
    args: &ReferenceArgs,
    config: &LexConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let reference_id = checked_reference(&args.reference_id)?;
    let lake = bootstrap::open_lake(config, false)?;
    let tools = bootstrap::retrieval_tools(config, flags, &lake)?;
    let citations = tools
        .referrer_lookup(reference_id, tools.link_limit)
        .await
        .with_context(|| format!("referrer lookup for {reference_id} failed"))?;
    output::citations(&citations, flags.format)
}

/// Graph walks start from a fragment, so the key must be a well-formed reference id.
fn checked_reference(reference_id: &str) -> anyhow::Result<&str> {
    anyhow::ensure!(
        lex_core::is_reference(reference_id),
        "'{reference_id}' is not a reference id (expected e.g. CA1961-160-1)"
    );
    Ok(reference_id)
}
