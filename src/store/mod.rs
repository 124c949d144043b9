
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::similarity::cosine_similarity;

/// An embedding vector paired with the text it was produced from
///
/// `id` is the record's identity within a store. Two records may share
/// embedding values but never an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A query result: a stored record plus its similarity against the query
///
/// The score lives on the hit, not on the record, so stored records stay
/// score-free.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub record: VectorRecord,
    pub score: f32,
}

/// In-memory vector store with brute-force cosine similarity search
///
/// Every query is a full linear scan over the stored records. That is a
/// deliberate trade-off for small corpora (tens to low thousands of
/// records); this is not a production vector database and maintains no
/// index.
///
/// The store performs no internal locking. `upsert` takes `&mut self` and
/// the search methods take `&self`, so concurrent reads are safe and the
/// borrow checker rules out concurrent read-write access. Callers that
/// need to share a store across threads should wrap it in their own
/// `Mutex` or `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryVectorStore {
    records: HashMap<String, VectorRecord>,
}

impl MemoryVectorStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any existing record with the same id
    ///
    /// Returns a copy of the stored record. Never fails; embedding
    /// dimensionality is not validated at this layer.
    #[inline]
    pub fn upsert(&mut self, record: VectorRecord) -> VectorRecord {
        debug!("Storing vector record: {}", record.id);
        self.records.insert(record.id.clone(), record.clone());
        record
    }

    /// Look up a record by id
    ///
    /// A missing id is not an error: returns `None` rather than panicking
    /// or surfacing a fault.
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<VectorRecord> {
        self.records.get(id).cloned()
    }

    /// Snapshot of every stored record, in unspecified order
    #[inline]
    #[must_use]
    pub fn get_all(&self) -> Vec<VectorRecord> {
        self.records.values().cloned().collect()
    }

    /// Number of stored records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find all records whose cosine similarity against `query` is at
    /// least `min_score`
    ///
    /// Scans every record; result order is unspecified. The stored records
    /// are never mutated by a search.
    #[inline]
    #[must_use]
    pub fn search_similar(&self, query: &[f32], min_score: f32) -> Vec<SearchHit> {
        let mut hits = Vec::new();

        for record in self.records.values() {
            let score = cosine_similarity(query, &record.embedding);
            if score >= min_score {
                hits.push(SearchHit {
                    record: record.clone(),
                    score,
                });
            }
        }

        debug!(
            "Similarity scan matched {} of {} records (min_score: {})",
            hits.len(),
            self.records.len(),
            min_score
        );
        hits
    }

    /// Find the `n` most similar records with similarity at least
    /// `min_score`
    ///
    /// Results are sorted by descending score; equal scores are broken by
    /// ascending id so the ordering is deterministic. Returns fewer than
    /// `n` hits if fewer records pass the threshold.
    #[inline]
    #[must_use]
    pub fn search_top_n(&self, query: &[f32], min_score: f32, n: usize) -> Vec<SearchHit> {
        let mut hits = self.search_similar(query, min_score);
        hits.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.record.id.cmp(&b.record.id))
        });
        hits.truncate(n);
        hits
    }
}
