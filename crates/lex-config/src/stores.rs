//! Store locations.

use serde::{Deserialize, Serialize};

fn default_lake_path() -> String {
    ".lexa/lake.duckdb".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// `DuckDB` file holding the phrase index and the citation graph.
    #[serde(default = "default_lake_path")]
    pub lake_path: String,

    /// Directory for cached fastembed model files. Empty means
    /// `~/.lexa/cache/fastembed`.
    #[serde(default)]
    pub embedding_cache: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            lake_path: default_lake_path(),
            embedding_cache: String::new(),
        }
    }
}

impl StoreConfig {
    /// Whether the lake should be opened in memory instead of from disk.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.lake_path.is_empty() || self.lake_path == ":memory:"
    }
}
