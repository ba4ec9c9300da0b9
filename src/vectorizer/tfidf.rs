use indexmap::IndexSet;
use num::Float;

use crate::{utils::math::vector::SparseVec, vectorizer::{corpus::CorpusStats, term::TermFrequency}};

/// TF-IDF calculation engine.
/// Plug a different weighting strategy into `VocabularyIndex` by implementing this.
pub trait TFIDFEngine<N>
where
    N: Float + Into<f64>,
{
    /// Generate the IDF vector
    /// # Arguments
    /// * `corpus` - corpus statistics
    /// * `terms` - vocabulary, position is the column index
    /// # Returns
    /// * `Vec<N>` - one idf weight per column
    fn idf_vec(corpus: &CorpusStats, terms: &IndexSet<Box<str>>) -> Vec<N>;

    /// Generate the (unweighted) TF vector.
    /// Terms outside the vocabulary are ignored.
    fn tf_vec(freq: &TermFrequency, terms: &IndexSet<Box<str>>) -> SparseVec<N>;

    /// TF x IDF, L2 normalized
    fn tfidf_vec(freq: &TermFrequency, terms: &IndexSet<Box<str>>, idf: &[N]) -> SparseVec<N> {
        let tf = Self::tf_vec(freq, terms);
        let pairs = tf
            .raw_iter()
            .map(|(idx, tf)| (idx as u32, tf * idf.get(idx).copied().unwrap_or_else(N::zero)))
            .collect();
        let mut vec = SparseVec::from_pairs(terms.len(), pairs);
        vec.normalize_l2();
        vec
    }
}

/// Default TF-IDF engine
/// - tf: `1 + ln(count)` (sublinear), 0 when absent
/// - idf: `ln(N / df) + 1`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl DefaultTFIDFEngine {
    pub fn new() -> Self {
        DefaultTFIDFEngine
    }

    /// sublinear term frequency
    #[inline]
    pub fn tf_calc(count: u64) -> f64 {
        if count == 0 {
            return 0.0;
        }
        1.0 + (count as f64).ln()
    }

    #[inline]
    pub fn idf_calc(doc_num: u64, doc_freq: u64) -> f64 {
        if doc_num == 0 || doc_freq == 0 {
            return 0.0;
        }
        (doc_num as f64 / doc_freq as f64).ln() + 1.0
    }
}

impl<N> TFIDFEngine<N> for DefaultTFIDFEngine
where
    N: Float + Into<f64>,
{
    fn idf_vec(corpus: &CorpusStats, terms: &IndexSet<Box<str>>) -> Vec<N> {
        let doc_num = corpus.get_doc_num();
        terms
            .iter()
            .map(|term| {
                let idf = Self::idf_calc(doc_num, corpus.get_term_count(term));
                N::from(idf).unwrap_or_else(N::zero)
            })
            .collect()
    }

    fn tf_vec(freq: &TermFrequency, terms: &IndexSet<Box<str>>) -> SparseVec<N> {
        let pairs = freq
            .iter()
            .filter_map(|(term, count)| {
                let idx = terms.get_index_of(term)?;
                let tf = N::from(Self::tf_calc(count))?;
                Some((idx as u32, tf))
            })
            .collect();
        SparseVec::from_pairs(terms.len(), pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(terms: &[&str]) -> IndexSet<Box<str>> {
        terms.iter().map(|t| Box::<str>::from(*t)).collect()
    }

    #[test]
    fn sublinear_tf_and_plain_idf() {
        assert_eq!(DefaultTFIDFEngine::tf_calc(0), 0.0);
        assert_eq!(DefaultTFIDFEngine::tf_calc(1), 1.0);
        assert!((DefaultTFIDFEngine::tf_calc(3) - (1.0 + 3f64.ln())).abs() < 1e-12);
        assert_eq!(DefaultTFIDFEngine::idf_calc(4, 4), 1.0);
        assert!((DefaultTFIDFEngine::idf_calc(4, 1) - (4f64.ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn tfidf_vector_is_unit_and_ignores_unknown_terms() {
        let terms = vocab(&["alpha", "beta", "gamma"]);
        let mut a = TermFrequency::new();
        a.add_terms(&["alpha", "alpha", "beta"]);
        let mut b = TermFrequency::new();
        b.add_terms(&["gamma"]);
        let stats = CorpusStats::from_documents(&[a.clone(), b]);
        let idf: Vec<f64> = <DefaultTFIDFEngine as TFIDFEngine<f64>>::idf_vec(&stats, &terms);

        let mut q = TermFrequency::new();
        q.add_terms(&["alpha", "unknown"]);
        let qv = <DefaultTFIDFEngine as TFIDFEngine<f64>>::tfidf_vec(&q, &terms, &idf);
        assert_eq!(qv.nnz(), 1);
        assert!((qv.norm() - 1.0).abs() < 1e-12);

        let av = <DefaultTFIDFEngine as TFIDFEngine<f64>>::tfidf_vec(&a, &terms, &idf);
        assert!((av.norm() - 1.0).abs() < 1e-12);
        // alpha has the larger tf, both share idf ln(2)+1
        assert!(av.get(0) > av.get(1));
        assert_eq!(av.get(2), 0.0);
    }

    #[test]
    fn empty_frequency_gives_zero_vector() {
        let terms = vocab(&["alpha"]);
        let stats = CorpusStats::new();
        let idf: Vec<f32> = <DefaultTFIDFEngine as TFIDFEngine<f32>>::idf_vec(&stats, &terms);
        let v = <DefaultTFIDFEngine as TFIDFEngine<f32>>::tfidf_vec(
            &TermFrequency::new(),
            &terms,
            &idf,
        );
        assert!(v.is_zero());
    }
}
