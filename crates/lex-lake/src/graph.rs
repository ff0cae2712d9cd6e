//! Citation-graph traversals as recursive `DuckDB` queries.
//!
//! `child_of` chains are walked with `WITH RECURSIVE`; the depth column both
//! orders the output (nearest first) and bounds the walk on malformed,
//! cyclic data.

use async_trait::async_trait;
use duckdb::params;

use crate::traits::{CitationGraph, GraphRow, Traversal};
use crate::{LakeError, LegalLake};

/// Deepest `child_of` chain followed before a walk stops.
const MAX_DEPTH: u32 = 32;

/// Fragments under the section(s) the key fragment refers to.
///
/// Params: key fragment name.
fn linked_sql(limit: usize) -> String {
    format!(
        "WITH RECURSIVE descendants(node, depth) AS (
            SELECT c.child, 1
            FROM refers_to r
            JOIN child_of c ON c.parent = r.section
            WHERE r.fragment = ?
            UNION ALL
            SELECT c.child, d.depth + 1
            FROM descendants d
            JOIN child_of c ON c.parent = d.node
            WHERE d.depth < {MAX_DEPTH}
        )
        SELECT f.name, f.phrase, f.headings
        FROM descendants d
        JOIN fragments f ON f.name = d.node
        ORDER BY d.depth, f.name
        LIMIT {limit}"
    )
}

/// Fragments of other documents that refer into a section enclosing the key.
///
/// Params: key fragment name (twice).
fn referrers_sql(limit: usize) -> String {
    format!(
        "WITH RECURSIVE ancestors(node, depth) AS (
            SELECT parent, 1
            FROM child_of
            WHERE child = ?
            UNION ALL
            SELECT c.parent, a.depth + 1
            FROM ancestors a
            JOIN child_of c ON c.child = a.node
            WHERE a.depth < {MAX_DEPTH}
        )
        SELECT f.name, f.phrase, f.headings
        FROM ancestors a
        JOIN refers_to r ON r.section = a.node
        JOIN fragments f ON f.name = r.fragment
        WHERE split_part(f.name, '-', 1) <> split_part(?, '-', 1)
        ORDER BY a.depth, f.name
        LIMIT {limit}"
    )
}

fn graph_row(row: &duckdb::Row<'_>) -> duckdb::Result<GraphRow> {
    Ok(GraphRow {
        name: row.get(0)?,
        phrase: row.get(1)?,
        headings: row.get(2)?,
    })
}

impl LegalLake {
    /// Run one traversal synchronously.
    ///
    /// Rows may repeat a name when several paths reach the same fragment.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if the query fails.
    pub fn walk(
        &self,
        traversal: Traversal,
        key: &str,
        limit: usize,
    ) -> Result<Vec<GraphRow>, LakeError> {
        let conn = self.conn()?;
        let rows = match traversal {
            Traversal::Linked => {
                let mut stmt = conn.prepare(&linked_sql(limit))?;
                let rows = stmt.query_map(params![key], graph_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            Traversal::Referrers => {
                let mut stmt = conn.prepare(&referrers_sql(limit))?;
                let rows = stmt.query_map(params![key, key], graph_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        tracing::debug!(
            traversal = traversal.as_str(),
            reference_id = key,
            limit,
            rows = rows.len(),
            "graph traversal"
        );
        Ok(rows)
    }
}

#[async_trait]
impl CitationGraph for LegalLake {
    async fn traverse(
        &self,
        traversal: Traversal,
        key: &str,
        limit: usize,
    ) -> Result<Vec<GraphRow>, LakeError> {
        let key = key.to_string();
        self.blocking(move |lake| lake.walk(traversal, &key, limit)).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::schemas::{ChildOfRow, FragmentRow, RefersToRow};

    fn names(rows: &[GraphRow]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    /// Crimes Act section 160 (two subsections) inside Part 8; the Sentencing
    /// Act cites both the section and the part, and a later Crimes Act section
    /// cites section 160 from inside the same act.
    fn graph_lake() -> LegalLake {
        let lake = LegalLake::open_in_memory().unwrap();
        let fragment = |name: &str| FragmentRow {
            name: name.to_string(),
            phrase: format!("text of {name}"),
            headings: "Heading".to_string(),
        };
        let child = |child: &str, parent: &str| ChildOfRow {
            child: child.to_string(),
            parent: parent.to_string(),
        };
        let cites = |fragment: &str, section: &str| RefersToRow {
            fragment: fragment.to_string(),
            section: section.to_string(),
        };

        lake.store_fragments(&[
            fragment("CA1961-160-1"),
            fragment("CA1961-160-2"),
            fragment("CA1961-167-1"),
            fragment("SA2002-8-1"),
            fragment("SA2002-9-1"),
        ])
        .unwrap();
        lake.store_sections(&["CA1961-160".to_string(), "CA1961-P8".to_string()])
            .unwrap();
        lake.store_child_of(&[
            child("CA1961-160-1", "CA1961-160"),
            child("CA1961-160-2", "CA1961-160"),
            child("CA1961-160", "CA1961-P8"),
            child("CA1961-167-1", "CA1961-P8"),
        ])
        .unwrap();
        lake.store_refers_to(&[
            cites("SA2002-8-1", "CA1961-160"),
            cites("CA1961-167-1", "CA1961-160"),
            cites("SA2002-9-1", "CA1961-P8"),
        ])
        .unwrap();
        lake
    }

    #[test]
    fn linked_walks_down_from_cited_section() {
        let lake = graph_lake();
        let rows = lake.walk(Traversal::Linked, "SA2002-8-1", 10).unwrap();
        assert_eq!(names(&rows), vec!["CA1961-160-1", "CA1961-160-2"]);
        assert_eq!(rows[0].phrase, "text of CA1961-160-1");
    }

    #[test]
    fn linked_reaches_nested_fragments_nearest_first() {
        let lake = graph_lake();
        let rows = lake.walk(Traversal::Linked, "SA2002-9-1", 10).unwrap();
        assert_eq!(
            names(&rows),
            vec!["CA1961-167-1", "CA1961-160-1", "CA1961-160-2"]
        );
    }

    #[test]
    fn referrers_walk_up_and_skip_same_document() {
        let lake = graph_lake();
        let rows = lake.walk(Traversal::Referrers, "CA1961-160-1", 10).unwrap();
        assert_eq!(names(&rows), vec!["SA2002-8-1", "SA2002-9-1"]);
    }

    #[test]
    fn traversal_respects_limit() {
        let lake = graph_lake();
        let rows = lake.walk(Traversal::Linked, "SA2002-9-1", 1).unwrap();
        assert_eq!(names(&rows), vec!["CA1961-167-1"]);
    }

    #[test]
    fn unknown_key_yields_nothing() {
        let lake = graph_lake();
        assert!(lake.walk(Traversal::Linked, "ZZ1-1-1", 10).unwrap().is_empty());
        assert!(lake.walk(Traversal::Referrers, "ZZ1-1-1", 10).unwrap().is_empty());
    }

    #[test]
    fn cyclic_child_of_terminates() {
        let lake = graph_lake();
        lake.store_child_of(&[
            ChildOfRow {
                child: "CA1961-P8".to_string(),
                parent: "CA1961-160".to_string(),
            },
        ])
        .unwrap();

        let rows = lake.walk(Traversal::Linked, "SA2002-8-1", 500).unwrap();
        assert!(!rows.is_empty());
        assert!(rows.len() <= 500);
    }

    #[tokio::test]
    async fn trait_traversal_matches_sync_walk() {
        let lake = graph_lake();
        let via_trait = lake
            .traverse(Traversal::Referrers, "CA1961-160-2", 10)
            .await
            .unwrap();
        assert_eq!(
            via_trait,
            lake.walk(Traversal::Referrers, "CA1961-160-2", 10).unwrap()
        );
    }
}
