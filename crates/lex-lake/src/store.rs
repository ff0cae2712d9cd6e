//! Bulk insertion into the legal lake.
//!
//! Embedding columns are written through parameterized `INSERT` with a
//! string-serialized array and a `::FLOAT[]` cast; the `DuckDB` appender does
//! not handle `FLOAT[]` columns from `Vec<f32>` reliably.

use duckdb::params;
use lex_embeddings::EMBEDDING_DIM;

use crate::schemas::{ChildOfRow, FragmentRow, PhraseRow, RefersToRow};
use crate::{LakeError, LegalLake};

/// Format a `Vec<f32>` as a `DuckDB` array literal string: `[0.1, 0.2, ...]`.
pub(crate) fn vec_to_sql(v: &[f32]) -> String {
    use std::fmt::Write;
    let mut s = String::with_capacity(v.len() * 10 + 2);
    s.push('[');
    for (i, x) in v.iter().enumerate() {
        if i > 0 {
            s.push_str(", ");
        }
        let _ = write!(s, "{x}");
    }
    s.push(']');
    s
}

impl LegalLake {
    /// Store phrases with their embeddings.
    ///
    /// Phrases without an embedding are stored with a `NULL` vector: they can
    /// still verify citations but never rank in phrase search.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DimensionMismatch`] for a wrongly sized embedding,
    /// or [`LakeError::DuckDb`] if any INSERT fails.
    pub fn store_phrases(&self, phrases: &[PhraseRow]) -> Result<(), LakeError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "INSERT INTO phrases (id, text, phrase, embedding) VALUES (?, ?, ?, ?::FLOAT[])",
        )?;

        for row in phrases {
            let embedding_sql = if row.embedding.is_empty() {
                None
            } else if row.embedding.len() == EMBEDDING_DIM {
                Some(vec_to_sql(&row.embedding))
            } else {
                return Err(LakeError::DimensionMismatch {
                    expected: EMBEDDING_DIM,
                    actual: row.embedding.len(),
                });
            };

            stmt.execute(params![row.id, row.text, row.phrase, embedding_sql])?;
        }

        tracing::debug!(rows = phrases.len(), "stored phrases");
        Ok(())
    }

    /// Store fragment nodes, replacing any existing node of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if any INSERT fails.
    pub fn store_fragments(&self, fragments: &[FragmentRow]) -> Result<(), LakeError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "INSERT OR REPLACE INTO fragments (name, phrase, headings) VALUES (?, ?, ?)",
        )?;
        for row in fragments {
            stmt.execute(params![row.name, row.phrase, row.headings])?;
        }
        tracing::debug!(rows = fragments.len(), "stored fragments");
        Ok(())
    }

    /// Store section nodes. Existing names are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if any INSERT fails.
    pub fn store_sections(&self, names: &[String]) -> Result<(), LakeError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("INSERT OR IGNORE INTO sections (name) VALUES (?)")?;
        for name in names {
            stmt.execute(params![name])?;
        }
        Ok(())
    }

    /// Store `refers_to` edges.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if any INSERT fails.
    pub fn store_refers_to(&self, edges: &[RefersToRow]) -> Result<(), LakeError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("INSERT INTO refers_to (fragment, section) VALUES (?, ?)")?;
        for edge in edges {
            stmt.execute(params![edge.fragment, edge.section])?;
        }
        Ok(())
    }

    /// Store `child_of` edges.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if any INSERT fails.
    pub fn store_child_of(&self, edges: &[ChildOfRow]) -> Result<(), LakeError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("INSERT INTO child_of (child, parent) VALUES (?, ?)")?;
        for edge in edges {
            stmt.execute(params![edge.child, edge.parent])?;
        }
        Ok(())
    }
}
