//! Ranked cosine search over the phrase index, and equality lookup of
//! authoritative fragment text.
//!
//! Embeddings stored as `FLOAT[]` are cast to `FLOAT[384]` at query time for
//! the fixed-length `array_cosine_similarity()` function. The scan is
//! brute-force; rows without an embedding never rank.

use async_trait::async_trait;
use duckdb::params;
use lex_embeddings::EMBEDDING_DIM;

use crate::store::vec_to_sql;
use crate::traits::{CitationLookup, PhraseHit, PhraseIndex, StoredText};
use crate::{LakeError, LegalLake};

impl LegalLake {
    /// Nearest phrases to a query vector, best first.
    ///
    /// Several hits may carry the same `id` when more than one phrase of a
    /// fragment ranks.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DimensionMismatch`] if the vector is not
    /// [`EMBEDDING_DIM`] long, or [`LakeError::DuckDb`] if the query fails.
    pub fn search_embedding(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<PhraseHit>, LakeError> {
        if query_embedding.len() != EMBEDDING_DIM {
            return Err(LakeError::DimensionMismatch {
                expected: EMBEDDING_DIM,
                actual: query_embedding.len(),
            });
        }

        let embedding_sql = vec_to_sql(query_embedding);
        let sql = format!(
            "SELECT id, text,
                    array_cosine_similarity(embedding::FLOAT[384], '{embedding_sql}'::FLOAT[384]) AS score
             FROM phrases
             WHERE embedding IS NOT NULL
             ORDER BY score DESC, id
             LIMIT {limit}"
        );

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(PhraseHit {
                id: row.get(0)?,
                text: row.get(1)?,
                score: row.get(2)?,
            })
        })?;

        let mut hits = Vec::new();
        for row in rows {
            hits.push(row?);
        }
        tracing::debug!(limit, rows = hits.len(), "phrase search");
        Ok(hits)
    }

    /// Authoritative text for `reference`, if any phrase row carries that id.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if the query fails.
    pub fn find_phrase(&self, reference: &str) -> Result<Option<StoredText>, LakeError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, text FROM phrases WHERE id = ? LIMIT 1")?;
        let mut rows = stmt.query_map(params![reference], |row| {
            Ok(StoredText {
                id: row.get(0)?,
                text: row.get(1)?,
            })
        })?;

        let found = rows.next().transpose()?;
        tracing::debug!(reference_id = reference, found = found.is_some(), "citation lookup");
        Ok(found)
    }

    fn search_text(&self, query: &str, limit: usize) -> Result<Vec<PhraseHit>, LakeError> {
        let embedding = self.embedder()?.embed(query)?;
        self.search_embedding(&embedding, limit)
    }
}

#[async_trait]
impl PhraseIndex for LegalLake {
    async fn nearest(&self, query: &str, limit: usize) -> Result<Vec<PhraseHit>, LakeError> {
        let query = query.to_string();
        self.blocking(move |lake| lake.search_text(&query, limit)).await
    }
}

#[async_trait]
impl CitationLookup for LegalLake {
    async fn find_citation(&self, reference: &str) -> Result<Option<StoredText>, LakeError> {
        let reference = reference.to_string();
        self.blocking(move |lake| lake.find_phrase(&reference)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use lex_embeddings::{EmbeddingError, TextEmbedder};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::schemas::PhraseRow;
    use crate::test_support::{SeededEmbedder, synthetic_embedding};

    fn phrase(id: &str, text: &str, seed: Option<u32>) -> PhraseRow {
        PhraseRow {
            id: id.to_string(),
            text: text.to_string(),
            phrase: format!("phrase of {id}"),
            embedding: seed.map(synthetic_embedding).unwrap_or_default(),
        }
    }

    fn seeded_lake() -> LegalLake {
        let lake = LegalLake::open_in_memory()
            .unwrap()
            .with_embedder(Arc::new(SeededEmbedder(10)));
        lake.store_phrases(&[
            phrase("CA1961-160-1", "# Crimes Act 1961\nhomicide", Some(10)),
            phrase("CA1961-160-1", "# Crimes Act 1961\nhomicide", Some(11)),
            phrase("CA1961-167-1", "# Crimes Act 1961\nmurder", Some(40)),
            phrase("SA2002-8-1", "# Sentencing Act 2002\npurposes", Some(400)),
            phrase("UNEMBEDDED1-1-1", "# Unembedded Act\nbody", None),
        ])
        .unwrap();
        lake
    }

    #[test]
    fn search_ranks_closest_first_and_keeps_duplicates() {
        let lake = seeded_lake();
        let hits = lake.search_embedding(&synthetic_embedding(10), 3).unwrap();

        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["CA1961-160-1", "CA1961-160-1", "CA1961-167-1"]);
        assert!(hits[0].score >= hits[1].score);
        assert!(hits[1].score >= hits[2].score);
    }

    #[test]
    fn unembedded_phrases_never_rank() {
        let lake = seeded_lake();
        let hits = lake.search_embedding(&synthetic_embedding(10), 50).unwrap();
        assert_eq!(hits.len(), 4);
        assert!(hits.iter().all(|h| h.id != "UNEMBEDDED1-1-1"));
    }

    #[test]
    fn search_rejects_wrong_dimension() {
        let lake = seeded_lake();
        assert!(matches!(
            lake.search_embedding(&[1.0, 2.0], 5),
            Err(LakeError::DimensionMismatch { actual: 2, .. })
        ));
    }

    #[test]
    fn lookup_finds_unembedded_text() {
        let lake = seeded_lake();
        let found = lake.find_phrase("UNEMBEDDED1-1-1").unwrap();
        assert_eq!(
            found,
            Some(StoredText {
                id: "UNEMBEDDED1-1-1".to_string(),
                text: "# Unembedded Act\nbody".to_string(),
            })
        );
        assert_eq!(lake.find_phrase("NOPE1-1-1").unwrap(), None);
    }

    #[tokio::test]
    async fn nearest_embeds_the_query() {
        let lake = seeded_lake();
        let hits = lake.nearest("culpable homicide", 1).await.unwrap();
        assert_eq!(hits[0].id, "CA1961-160-1");
    }

    #[tokio::test]
    async fn nearest_without_embedder_fails() {
        let lake = LegalLake::open_in_memory().unwrap();
        let err = lake.nearest("anything", 5).await.unwrap_err();
        assert!(matches!(err, LakeError::NoEmbedder));
    }

    /// Embeds like [`SeededEmbedder`] after holding its thread for `delay`.
    struct SlowEmbedder {
        delay: Duration,
    }

    impl TextEmbedder for SlowEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            std::thread::sleep(self.delay);
            Ok(synthetic_embedding(10))
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn slow_embedding_leaves_the_runtime_responsive() {
        let lake = seeded_lake().with_embedder(Arc::new(SlowEmbedder {
            delay: Duration::from_millis(300),
        }));

        let ticks = Arc::new(AtomicUsize::new(0));
        let ticker = tokio::spawn({
            let ticks = Arc::clone(&ticks);
            async move {
                let mut interval = tokio::time::interval(Duration::from_millis(10));
                loop {
                    interval.tick().await;
                    ticks.fetch_add(1, Ordering::Relaxed);
                }
            }
        });

        let hits = lake.nearest("culpable homicide", 1).await.unwrap();
        ticker.abort();

        assert_eq!(hits[0].id, "CA1961-160-1");
        assert!(
            ticks.load(Ordering::Relaxed) >= 10,
            "ticker starved: {} ticks",
            ticks.load(Ordering::Relaxed)
        );
    }

    #[tokio::test]
    async fn lookups_through_clones_share_the_lake() {
        let lake = seeded_lake();
        let clone = lake.clone();
        clone
            .store_phrases(&[phrase("LA2020-1-1", "# Later Act\nadded", None)])
            .unwrap();

        let found = lake.find_citation("LA2020-1-1").await.unwrap();
        assert_eq!(found.map(|stored| stored.text), Some("# Later Act\nadded".to_string()));
    }
}
