use std::fmt::Debug;

use num::Float;
use rayon::prelude::*;

use crate::{utils::math::vector::SparseVec, vectorizer::{tfidf::TFIDFEngine, VocabularyIndex}};

/// Structure to store similarity results
pub struct Hits {
    /// (document index, score in [0, 1])
    pub list: Vec<(usize, f64)>,
}

impl Hits {
    /// Create a new Hits instance
    pub fn new(vec: Vec<(usize, f64)>) -> Self {
        Hits { list: vec }
    }

    /// Sort results by descending score.
    /// Equal scores keep ascending document index.
    pub fn sort_by_score(&mut self) -> &mut Self {
        // Remove NaN scores
        self.list.retain(|(_, s)| !s.is_nan());
        self.list.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        self
    }

    /// Keep the first `n` hits
    pub fn truncate(&mut self, n: usize) -> &mut Self {
        self.list.truncate(n);
        self
    }

    /// Drop the hit for `doc`
    pub fn exclude(&mut self, doc: usize) -> &mut Self {
        self.list.retain(|(i, _)| *i != doc);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// score of `doc`, if present
    pub fn score_of(&self, doc: usize) -> Option<f64> {
        self.list.iter().find(|(i, _)| *i == doc).map(|(_, s)| *s)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(usize, f64)> {
        self.list.iter()
    }
}

impl IntoIterator for Hits {
    type Item = (usize, f64);
    type IntoIter = std::vec::IntoIter<(usize, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            // each hit on its own line
            writeln!(f, "Hits [")?;
            for (doc, score) in &self.list {
                writeln!(f, "    {}: {:.6}", doc, score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

/// Cosine of two unit (or zero) vectors, clamped to [0, 1].
/// A zero vector on either side scores 0.
#[inline]
pub fn cosine<N>(a: &SparseVec<N>, b: &SparseVec<N>) -> f64
where
    N: Float + Into<f64>,
{
    if a.is_zero() || b.is_zero() || a.len() != b.len() {
        return 0.0;
    }
    a.dot(b).clamp(0.0, 1.0)
}

impl<N, E> VocabularyIndex<N, E>
where
    N: Float + Into<f64> + Send + Sync,
    E: TFIDFEngine<N>,
{
    /// Score every document against a free text query
    ///
    /// # Arguments
    /// * `query` - raw query text, normalized like document text (no title boost)
    ///
    /// # Returns
    /// * `Hits` - one hit per document, best first, ties by document index
    pub fn similarity_to_query(&self, query: &str) -> Hits {
        let q = self.project_query(query);
        self.similarity_to_vector(&q)
    }

    /// Score every document against a vector already in this index's space
    pub fn similarity_to_vector(&self, q: &SparseVec<N>) -> Hits {
        let list = self
            .document_vectors()
            .par_iter()
            .enumerate()
            .map(|(i, row)| (i, cosine(q, row)))
            .collect();
        let mut hits = Hits::new(list);
        hits.sort_by_score();
        hits
    }

    /// Pairwise cosine similarity of all documents.
    /// The diagonal is 1.0 for a non-zero row and 0.0 for a zero row.
    pub fn similarity_matrix(&self) -> Vec<Vec<f64>> {
        let rows = self.document_vectors();
        rows.par_iter()
            .enumerate()
            .map(|(i, a)| {
                rows.iter()
                    .enumerate()
                    .map(|(j, b)| {
                        if i == j {
                            if a.is_zero() { 0.0 } else { 1.0 }
                        } else {
                            cosine(a, b)
                        }
                    })
                    .collect::<Vec<f64>>()
            })
            .collect()
    }

    /// Documents most similar to document `doc`, itself excluded
    ///
    /// # Arguments
    /// * `doc` - row index, out of range gives no hits
    /// * `top_n` - maximum number of hits
    pub fn similar_to_document(&self, doc: usize, top_n: usize) -> Hits {
        let Some(row) = self.document_vector(doc) else {
            return Hits::new(Vec::new());
        };
        let mut hits = self.similarity_to_vector(row);
        hits.exclude(doc).truncate(top_n);
        hits
    }
}
