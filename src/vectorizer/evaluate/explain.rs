use ahash::AHashMap;
use num::Float;
use serde::{Deserialize, Serialize};

use crate::{config::ExplainConfig, vectorizer::{tfidf::TFIDFEngine, VocabularyIndex}};

/// Why two documents are similar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// shared terms, strongest contribution first
    pub common_terms: Vec<String>,
    /// (term, weight_a * weight_b), descending
    pub top_contributing_terms: Vec<(String, f64)>,
    /// heaviest terms only in A
    pub unique_to_a: Vec<String>,
    /// heaviest terms only in B
    pub unique_to_b: Vec<String>,
}

impl<N, E> VocabularyIndex<N, E>
where
    N: Float + Into<f64> + Send + Sync,
    E: TFIDFEngine<N>,
{
    /// Heaviest terms of one document
    ///
    /// # Arguments
    /// * `doc` - row index
    /// * `n` - maximum number of terms
    ///
    /// # Returns
    /// * `Vec<(&str, f64)>` - positive weights, descending, ties by term
    pub fn top_terms(&self, doc: usize, n: usize) -> Vec<(&str, f64)> {
        let Some(row) = self.document_vector(doc) else {
            return Vec::new();
        };
        let mut terms: Vec<(&str, f64)> = row
            .raw_iter()
            .filter_map(|(col, w)| {
                let w: f64 = w.into();
                if w > 0.0 {
                    self.term(col).map(|t| (t, w))
                } else {
                    None
                }
            })
            .collect();
        terms.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        terms.truncate(n);
        terms
    }

    /// Explain the similarity of documents `a` and `b` with the default limits
    pub fn explain(&self, a: usize, b: usize) -> Explanation {
        self.explain_with(a, b, &ExplainConfig::default())
    }

    /// Explain the similarity of documents `a` and `b`.
    /// Only each document's own top terms take part.
    pub fn explain_with(&self, a: usize, b: usize, config: &ExplainConfig) -> Explanation {
        let top_a = self.top_terms(a, config.top_terms_per_document);
        let top_b = self.top_terms(b, config.top_terms_per_document);
        let weights_b: AHashMap<&str, f64> = top_b.iter().copied().collect();
        let weights_a: AHashMap<&str, f64> = top_a.iter().copied().collect();

        let mut contributions: Vec<(&str, f64)> = top_a
            .iter()
            .filter_map(|&(term, wa)| weights_b.get(term).map(|&wb| (term, wa * wb)))
            .collect();
        contributions.sort_by(|x, y| y.1.total_cmp(&x.1).then_with(|| x.0.cmp(y.0)));

        // top_terms lists are already weight ordered
        let unique = |own: &[(&str, f64)], other: &AHashMap<&str, f64>| -> Vec<String> {
            own.iter()
                .filter(|(term, _)| !other.contains_key(term))
                .take(config.unique_terms)
                .map(|(term, _)| term.to_string())
                .collect()
        };

        Explanation {
            common_terms: contributions.iter().map(|(t, _)| t.to_string()).collect(),
            top_contributing_terms: contributions
                .iter()
                .take(config.top_contributing)
                .map(|(t, c)| (t.to_string(), *c))
                .collect(),
            unique_to_a: unique(&top_a, &weights_b),
            unique_to_b: unique(&top_b, &weights_a),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ExplainConfig;
    use crate::document::Document;
    use crate::vectorizer::VocabularyIndex;

    fn index() -> VocabularyIndex {
        let corpus = vec![
            Document::new("Graph neural networks", "Message passing on molecular graphs"),
            Document::new("Graph kernels", "Kernel methods on molecular graphs"),
            Document::new("Crop rotation", "Soil health in farming"),
        ];
        VocabularyIndex::fit(&corpus, true)
    }

    #[test]
    fn top_terms_are_descending() {
        let idx = index();
        let top = idx.top_terms(0, 3);
        assert_eq!(top.len(), 3);
        assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
        assert!(top.iter().all(|(_, w)| *w > 0.0));
        assert!(idx.top_terms(42, 3).is_empty());
    }

    #[test]
    fn explains_shared_and_unique_terms() {
        let idx = index();
        let e = idx.explain(0, 1);
        assert!(e.common_terms.contains(&"graph".to_string()));
        assert!(e.common_terms.contains(&"molecular graph".to_string()));
        assert!(e.top_contributing_terms.len() <= 5);
        assert!(e.top_contributing_terms.windows(2).all(|w| w[0].1 >= w[1].1));
        assert!(e.unique_to_a.iter().all(|t| !e.common_terms.contains(t)));
        assert!(e.unique_to_b.contains(&"kernel".to_string()));
        assert!(e.unique_to_a.len() <= 5 && e.unique_to_b.len() <= 5);
    }

    #[test]
    fn unrelated_documents_share_nothing() {
        let idx = index();
        let e = idx.explain(0, 2);
        assert!(e.common_terms.is_empty());
        assert!(e.top_contributing_terms.is_empty());
        assert!(!e.unique_to_a.is_empty());
        assert!(!e.unique_to_b.is_empty());
    }

    #[test]
    fn limits_are_configurable() {
        let idx = index();
        let config = ExplainConfig {
            top_terms_per_document: 20,
            top_contributing: 1,
            unique_terms: 1,
        };
        let e = idx.explain_with(0, 1, &config);
        assert_eq!(e.top_contributing_terms.len(), 1);
        assert_eq!(e.unique_to_a.len(), 1);
        assert_eq!(e.unique_to_b.len(), 1);
    }
}
