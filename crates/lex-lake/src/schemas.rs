//! `DuckDB` table DDL and row structs for the legal lake.
//!
//! Two families of tables live in one file:
//! - `phrases`: the semantic phrase index, also the authoritative text store
//!   used for citation verification. Several phrases may be embedded per
//!   fragment, so `id` is not unique.
//! - `fragments`, `sections`, `refers_to`, `child_of`: the citation graph.
//!   `refers_to` runs from a fragment to the section it cites; `child_of` runs
//!   from a fragment or section to its enclosing section.

use serde::{Deserialize, Serialize};

// ── Table DDL ──────────────────────────────────────────────────────────────

/// Phrase index. Embeddings are stored as `FLOAT[]` and cast to the fixed
/// index dimension at query time.
pub const CREATE_PHRASES: &str = "
CREATE TABLE IF NOT EXISTS phrases (
    id TEXT NOT NULL,
    text TEXT NOT NULL,
    phrase TEXT NOT NULL,
    embedding FLOAT[]
);
";

pub const CREATE_FRAGMENTS: &str = "
CREATE TABLE IF NOT EXISTS fragments (
    name TEXT PRIMARY KEY,
    phrase TEXT NOT NULL,
    headings TEXT NOT NULL
);
";

pub const CREATE_SECTIONS: &str = "
CREATE TABLE IF NOT EXISTS sections (
    name TEXT PRIMARY KEY
);
";

pub const CREATE_REFERS_TO: &str = "
CREATE TABLE IF NOT EXISTS refers_to (
    fragment TEXT NOT NULL,
    section TEXT NOT NULL
);
";

pub const CREATE_CHILD_OF: &str = "
CREATE TABLE IF NOT EXISTS child_of (
    child TEXT NOT NULL,
    parent TEXT NOT NULL
);
";

pub const CREATE_INDEXES: &str = "
CREATE INDEX IF NOT EXISTS idx_phrases_id ON phrases(id);
CREATE INDEX IF NOT EXISTS idx_refers_to_fragment ON refers_to(fragment);
CREATE INDEX IF NOT EXISTS idx_refers_to_section ON refers_to(section);
CREATE INDEX IF NOT EXISTS idx_child_of_child ON child_of(child);
CREATE INDEX IF NOT EXISTS idx_child_of_parent ON child_of(parent);
";

// ── Row structs ────────────────────────────────────────────────────────────

/// One embedded phrase of a fragment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhraseRow {
    /// Reference id of the fragment the phrase belongs to.
    pub id: String,
    /// Full markdown text of the fragment.
    pub text: String,
    /// The span of text that was embedded.
    pub phrase: String,
    /// Empty when the phrase has not been embedded yet.
    #[serde(default)]
    pub embedding: Vec<f32>,
}

/// A fragment node of the citation graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FragmentRow {
    pub name: String,
    pub phrase: String,
    pub headings: String,
}

/// Edge from a fragment to the section it cites.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefersToRow {
    pub fragment: String,
    pub section: String,
}

/// Edge from a fragment or section to its enclosing section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChildOfRow {
    pub child: String,
    pub parent: String,
}
