pub mod details;

use ahash::AHashSet;

use crate::config::EngineConfig;
use crate::document::{Document, RankedResult};
use crate::vectorizer::analyzer::TextNormalizer;
use crate::vectorizer::evaluate::explain::Explanation;
use crate::vectorizer::evaluate::scoring::Hits;
use crate::vectorizer::VocabularyIndex;

pub use details::CalculationReport;

/// Content-based ranking engine.
///
/// Holds configuration only. Every call fits its own [`VocabularyIndex`]
/// from the documents handed to it and drops it before returning, so one
/// engine can serve concurrent callers without locking.
///
/// # Examples
/// ```
/// use cbf_recommender::{CbfEngine, Document};
/// let engine = CbfEngine::new();
/// let corpus = vec![
///     Document::new("Machine learning classification", "Supervised models for text"),
///     Document::new("Gardening tips", "Growing tomatoes at home"),
/// ];
/// let ranked = engine.rank_by_relevance(&corpus, "machine learning");
/// assert_eq!(ranked[0].document.title, "Machine learning classification");
/// assert_eq!(ranked[1].relevance_score(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct CbfEngine {
    config: EngineConfig,
    normalizer: TextNormalizer,
}

impl Default for CbfEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CbfEngine {
    /// Engine with the default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let normalizer = TextNormalizer::with_config(&config.normalizer);
        Self { config, normalizer }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Fit a fresh index over `corpus` with this engine's configuration
    pub fn fit(&self, corpus: &[Document]) -> VocabularyIndex {
        VocabularyIndex::build(
            corpus,
            self.normalizer.clone(),
            &self.config.vectorizer,
            self.config.title_boost,
        )
    }

    /// Rank every document of `corpus` against `query`
    ///
    /// # Arguments
    /// * `corpus` - documents to rank, order breaks ties
    /// * `query` - free text query
    ///
    /// # Returns
    /// * `Vec<RankedResult>` - one result per document, zero scores included
    pub fn rank_by_relevance(&self, corpus: &[Document], query: &str) -> Vec<RankedResult> {
        if corpus.is_empty() {
            return Vec::new();
        }
        let index = self.fit(corpus);
        to_ranked(index.similarity_to_query(query), corpus, 0)
    }

    /// Recommend candidates similar to a selection of documents.
    ///
    /// The selection is merged into one profile query, one token run per
    /// selected document, and scored against an index fitted over the
    /// candidates alone. Candidates whose title matches a selected title
    /// (trimmed, case-insensitive) are never returned.
    ///
    /// # Arguments
    /// * `selected` - documents the user picked
    /// * `candidates` - pool to recommend from
    /// * `top_n` - maximum number of results
    pub fn recommend_from_selection(
        &self,
        selected: &[Document],
        candidates: &[Document],
        top_n: usize,
    ) -> Vec<RankedResult> {
        if selected.is_empty() || candidates.is_empty() {
            return Vec::new();
        }
        let index = self.fit(candidates);
        let profile: Vec<Vec<String>> = selected
            .iter()
            .map(|d| self.normalizer.tokens(&format!("{} {}", d.title, d.abstract_text)))
            .collect();
        let profile_vec = index.project_fields(&profile);

        let selected_titles: AHashSet<String> = selected.iter().map(Document::title_key).collect();
        let mut hits = index.similarity_to_vector(&profile_vec);
        hits.list.retain(|(i, _)| !selected_titles.contains(&candidates[*i].title_key()));
        hits.truncate(top_n);
        tracing::debug!(
            "recommended {} of {} candidates from {} selected",
            hits.len(),
            candidates.len(),
            selected.len()
        );
        to_ranked(hits, candidates, 0)
    }

    /// Candidates most similar to `reference`.
    /// The reference need not be one of the candidates and is never returned itself.
    pub fn find_similar_to(
        &self,
        reference: &Document,
        candidates: &[Document],
        top_n: usize,
    ) -> Vec<RankedResult> {
        if candidates.is_empty() {
            return Vec::new();
        }
        let mut pool = Vec::with_capacity(candidates.len() + 1);
        pool.push(reference.clone());
        pool.extend_from_slice(candidates);
        let index = self.fit(&pool);
        // row 0 is the reference, candidate i sits at row i + 1
        to_ranked(index.similar_to_document(0, top_n), candidates, 1)
    }

    /// Explain why documents `a` and `b` of `corpus` are similar
    pub fn explain(&self, corpus: &[Document], a: usize, b: usize) -> Explanation {
        if a >= corpus.len() || b >= corpus.len() {
            return Explanation::default();
        }
        self.fit(corpus).explain_with(a, b, &self.config.explain)
    }
}

/// Turn ordered hits into ranked copies, `offset` maps index rows to `docs`
fn to_ranked(hits: Hits, docs: &[Document], offset: usize) -> Vec<RankedResult> {
    hits.into_iter()
        .filter_map(|(row, score)| docs.get(row.checked_sub(offset)?).map(|d| (d, score)))
        .enumerate()
        .map(|(pos, (doc, score))| RankedResult::new(doc, score, pos + 1))
        .collect()
}

/// [`CbfEngine::rank_by_relevance`] with the default configuration
pub fn rank_by_relevance(corpus: &[Document], query: &str) -> Vec<RankedResult> {
    CbfEngine::new().rank_by_relevance(corpus, query)
}

/// [`CbfEngine::recommend_from_selection`] with the default configuration
pub fn recommend_from_selection(
    selected: &[Document],
    candidates: &[Document],
    top_n: usize,
) -> Vec<RankedResult> {
    CbfEngine::new().recommend_from_selection(selected, candidates, top_n)
}

/// [`CbfEngine::find_similar_to`] with the default configuration
pub fn find_similar_to(
    reference: &Document,
    candidates: &[Document],
    top_n: usize,
) -> Vec<RankedResult> {
    CbfEngine::new().find_similar_to(reference, candidates, top_n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::with_positional_ids;

    fn corpus(docs: &[(&str, &str)]) -> Vec<Document> {
        with_positional_ids(docs.iter().map(|(t, a)| Document::new(*t, *a)))
    }

    fn papers() -> Vec<Document> {
        corpus(&[
            (
                "Deep Learning for Natural Language Processing",
                "A survey of deep learning for sentiment analysis and machine translation.",
            ),
            (
                "Machine Learning in Healthcare",
                "Machine learning algorithms for medical diagnosis and drug discovery.",
            ),
            (
                "Neural Networks for Image Recognition",
                "Convolutional neural networks for image classification.",
            ),
            (
                "Text Mining and Sentiment Analysis",
                "Extracting opinions from text with natural language processing.",
            ),
            ("Reinforcement Learning in Robotics", "Robot navigation with reinforcement learning."),
        ])
    }

    #[test]
    fn single_document_exact_query_scores_100() {
        let ranked = rank_by_relevance(&corpus(&[("cat dog", "")]), "cat dog");
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].relevance_score(), 100.0);
        assert_eq!(ranked[0].relevance_rank, 1);
    }

    #[test]
    fn relevant_document_ranks_first() {
        let docs = corpus(&[
            ("Gardening tips", "Growing tomatoes and herbs"),
            ("Machine learning classification", "Supervised classification models"),
        ]);
        let ranked = rank_by_relevance(&docs, "machine learning");
        assert_eq!(ranked[0].document.id, 1);
        assert!(ranked[0].relevance_score() > 0.0);
        assert_eq!(ranked[1].document.id, 0);
        assert_eq!(ranked[1].relevance_score(), 0.0);
        assert_eq!(ranked[1].relevance_rank, 2);
    }

    #[test]
    fn empty_corpus_ranks_nothing() {
        assert!(rank_by_relevance(&[], "anything").is_empty());
    }

    #[test]
    fn ranking_is_total_and_ordered() {
        let docs = papers();
        let ranked = rank_by_relevance(&docs, "natural language processing text analysis");
        assert_eq!(ranked.len(), docs.len());
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.relevance_score() >= b.relevance_score());
            if a.relevance_score() == b.relevance_score() {
                assert!(a.document.id < b.document.id);
            }
            assert_eq!(a.relevance_rank + 1, b.relevance_rank);
        }
        let top: Vec<usize> = ranked.iter().take(2).map(|r| r.document.id).collect();
        assert!(top.contains(&0) && top.contains(&3));
    }

    #[test]
    fn identical_documents_keep_corpus_order() {
        // every term appears in every document: the fallback tier keeps them
        let docs = corpus(&vec![("zymurgy", ""); 30]);
        let ranked = rank_by_relevance(&docs, "zymurgy");
        assert_eq!(ranked.len(), 30);
        let ids: Vec<usize> = ranked.iter().map(|r| r.document.id).collect();
        assert_eq!(ids, (0..30).collect::<Vec<_>>());
        assert!(ranked.iter().all(|r| r.relevance_score() == 100.0));
    }

    #[test]
    fn unusable_corpus_ranks_everything_at_zero() {
        let docs = corpus(&[("", ""), ("the of and", "12 34")]);
        let ranked = rank_by_relevance(&docs, "deep learning");
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.relevance_score() == 0.0));
        assert_eq!(ranked[0].document.id, 0);
    }

    #[test]
    fn recommendations_exclude_selected_titles() {
        let candidates = papers();
        let selected = vec![Document::new(
            "  TEXT MINING and sentiment analysis ",
            "opinion mining",
        )];
        let recs = recommend_from_selection(&selected, &candidates, 10);
        assert!(!recs.is_empty());
        assert!(recs.iter().all(|r| r.document.id != 3));
        assert_eq!(recs[0].document.id, 0);
        assert!(recs.windows(2).all(|w| w[0].relevance_score() >= w[1].relevance_score()));
        assert_eq!(recommend_from_selection(&selected, &candidates, 2).len(), 2);
    }

    #[test]
    fn recommendations_need_both_inputs() {
        assert!(recommend_from_selection(&[], &papers(), 5).is_empty());
        assert!(recommend_from_selection(&papers(), &[], 5).is_empty());
    }

    #[test]
    fn similar_to_external_reference() {
        let candidates = papers();
        let reference = Document::new(
            "Sentiment analysis of product reviews",
            "natural language processing",
        );
        let similar = find_similar_to(&reference, &candidates, 2);
        assert_eq!(similar.len(), 2);
        let ids: Vec<usize> = similar.iter().map(|r| r.document.id).collect();
        assert!(ids.contains(&3));
        assert_eq!(similar[0].relevance_rank, 1);
        assert!(find_similar_to(&reference, &[], 3).is_empty());
    }

    #[test]
    fn explains_pairs_within_a_corpus() {
        let engine = CbfEngine::new();
        let docs = papers();
        let e = engine.explain(&docs, 0, 3);
        assert!(e
            .common_terms
            .iter()
            .any(|t| t == "sentiment analysis" || t == "natural language"));
        assert_eq!(engine.explain(&docs, 0, 99), Explanation::default());
    }

    #[test]
    fn configuration_reaches_the_normalizer() {
        let mut config = EngineConfig::default();
        config.normalizer.extra_stop_words = vec!["machine".into(), "learning".into()];
        let engine = CbfEngine::with_config(config);
        let docs = corpus(&[("Machine learning", "classification"), ("Gardening", "tomato")]);
        let ranked = engine.rank_by_relevance(&docs, "machine learning");
        assert!(ranked.iter().all(|r| r.relevance_score() == 0.0));
    }
}
