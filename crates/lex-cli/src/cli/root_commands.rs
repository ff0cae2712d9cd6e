use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Semantic search for legislation matching a phrase.
    Search(SearchArgs),
    /// Fragments inside the sections a reference cites.
    Linked(ReferenceArgs),
    /// Fragments of other acts that cite into a reference's sections.
    Referrers(ReferenceArgs),
    /// Check a saved model answer and render the final markdown document.
    Verify(VerifyArgs),
    /// Drive the research run loop over a recorded event transcript.
    Replay(ReplayArgs),
    /// Load JSONL rows into the lake.
    Ingest(IngestArgs),
    /// Print the model-facing tool catalogue.
    Tools(ToolsArgs),
}

#[derive(Clone, Debug, Args)]
pub struct SearchArgs {
    /// Phrase to search for.
    pub query: String,
}

#[derive(Clone, Debug, Args)]
pub struct ReferenceArgs {
    /// Reference id of the fragment to start from, e.g. `CA1961-160-1`.
    pub reference_id: String,
}

#[derive(Clone, Debug, Args)]
pub struct VerifyArgs {
    /// Saved answer: an `LlmResult` JSON document or free text.
    pub file: PathBuf,
    /// The user's original query.
    #[arg(long, default_value = "")]
    pub query: String,
    /// Write the markdown document here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct ReplayArgs {
    /// JSONL file with one agent event per line.
    pub events: PathBuf,
    /// The user's original query.
    #[arg(long, default_value = "")]
    pub query: String,
    /// Write the final markdown document here.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct IngestArgs {
    /// Phrase rows (`id`, `text`, `phrase`, optional `embedding`).
    #[arg(long)]
    pub phrases: Option<PathBuf>,
    /// Fragment rows (`name`, `phrase`, `headings`).
    #[arg(long)]
    pub fragments: Option<PathBuf>,
    /// Section names, one JSON string per line.
    #[arg(long)]
    pub sections: Option<PathBuf>,
    /// Citation edges (`fragment`, `section`).
    #[arg(long)]
    pub refers_to: Option<PathBuf>,
    /// Containment edges (`child`, `parent`).
    #[arg(long)]
    pub child_of: Option<PathBuf>,
    /// Embed phrase rows that arrive without an embedding.
    #[arg(long)]
    pub embed: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ToolsArgs {
    /// Also print the JSON schema of the structured answer.
    #[arg(long)]
    pub with_output_schema: bool,
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;

    use crate::cli::{Cli, Commands};

    #[test]
    fn verify_takes_query_and_out() {
        let cli = Cli::try_parse_from([
            "lexa",
            "verify",
            "answer.json",
            "--query",
            "Is homicide culpable?",
            "--out",
            "report.md",
        ])
        .expect("cli should parse");

        let Commands::Verify(args) = cli.command else {
            panic!("expected verify");
        };
        assert_eq!(args.file, Path::new("answer.json"));
        assert_eq!(args.query, "Is homicide culpable?");
        assert_eq!(args.out.as_deref(), Some(Path::new("report.md")));
    }

    #[test]
    fn replay_query_defaults_to_empty() {
        let cli = Cli::try_parse_from(["lexa", "replay", "run.jsonl"]).expect("cli should parse");

        let Commands::Replay(args) = cli.command else {
            panic!("expected replay");
        };
        assert_eq!(args.events, Path::new("run.jsonl"));
        assert!(args.query.is_empty());
        assert!(args.out.is_none());
    }

    #[test]
    fn ingest_accepts_any_subset_of_tables() {
        let cli = Cli::try_parse_from([
            "lexa",
            "ingest",
            "--refers-to",
            "edges.jsonl",
            "--child-of",
            "tree.jsonl",
            "--embed",
        ])
        .expect("cli should parse");

        let Commands::Ingest(args) = cli.command else {
            panic!("expected ingest");
        };
        assert!(args.phrases.is_none());
        assert_eq!(args.refers_to.as_deref(), Some(Path::new("edges.jsonl")));
        assert_eq!(args.child_of.as_deref(), Some(Path::new("tree.jsonl")));
        assert!(args.embed);
    }

    #[test]
    fn reference_commands_require_an_id() {
        assert!(Cli::try_parse_from(["lexa", "referrers"]).is_err());
    }
}
