pub mod analyzer;
pub mod corpus;
pub mod evaluate;
pub mod term;
pub mod tfidf;

use std::marker::PhantomData;

use indexmap::IndexSet;
use num::Float;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, VectorizerParams, VectorizerPolicy};
use crate::document::Document;
use crate::error::VocabularyError;
use crate::utils::math::vector::SparseVec;
use crate::vectorizer::analyzer::TextNormalizer;
use crate::vectorizer::corpus::CorpusStats;
use crate::vectorizer::term::TermFrequency;
use crate::vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Which vectorizer configuration produced an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitTier {
    /// the size-dependent configuration
    Primary,
    /// the permissive unigram configuration, after the primary one degenerated
    Fallback,
    /// both configurations failed, the index has zero columns
    Empty,
}

/// One document prepared for weighting.
/// `fields` keep the token runs apart so n-grams never span them.
#[derive(Debug, Clone, Default)]
pub struct AnalyzedDoc {
    pub text: String,
    pub fields: Vec<Vec<String>>,
}

impl AnalyzedDoc {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|f| f.is_empty())
    }
}

/// Term-weight matrix of one corpus snapshot.
///
/// Built by [`VocabularyIndex::fit`] and immutable afterwards: there is no
/// `&mut self` method, a changed corpus needs a fresh index.
///
/// - `terms` maps a term (unigram or `"w1 w2"` bigram) to its column, alphabetical
/// - `idf` holds one weight per column
/// - each document row is a sparse tf-idf vector with unit L2 norm,
///   or the zero vector when it shares nothing with the vocabulary
///
/// `VocabularyIndex<N, E>` has the following generic parameters:
/// - `N`: weight type (f64 or f32)
/// - `E`: TF-IDF calculation engine (e.g. `DefaultTFIDFEngine`)
#[derive(Debug, Clone)]
pub struct VocabularyIndex<N = f64, E = DefaultTFIDFEngine>
where
    N: Float + Into<f64> + Send + Sync,
    E: TFIDFEngine<N>,
{
    terms: IndexSet<Box<str>>,
    idf: Vec<N>,
    document_vectors: Vec<SparseVec<N>>,
    processed_texts: Vec<String>,
    params: Option<VectorizerParams>,
    tier: FitTier,
    normalizer: TextNormalizer,
    _marker: PhantomData<E>,
}

impl VocabularyIndex {
    /// Fit an index over `corpus` with the default configuration.
    /// Never fails: degenerate input yields an empty index.
    ///
    /// # Arguments
    /// * `corpus` - documents, the position is the row index
    /// * `title_boost` - count the title twice
    pub fn fit(corpus: &[Document], title_boost: bool) -> Self {
        let config = EngineConfig {
            title_boost,
            ..EngineConfig::default()
        };
        Self::fit_with_config(corpus, &config)
    }

    pub fn fit_with_config(corpus: &[Document], config: &EngineConfig) -> Self {
        let normalizer = TextNormalizer::with_config(&config.normalizer);
        Self::build(corpus, normalizer, &config.vectorizer, config.title_boost)
    }
}

impl<N, E> VocabularyIndex<N, E>
where
    N: Float + Into<f64> + Send + Sync,
    E: TFIDFEngine<N>,
{
    /// Fit with an explicit normalizer and vectorizer policy
    pub fn build(
        corpus: &[Document],
        normalizer: TextNormalizer,
        policy: &VectorizerPolicy,
        title_boost: bool,
    ) -> Self {
        let docs: Vec<AnalyzedDoc> = corpus
            .iter()
            .map(|doc| analyze_document(&normalizer, doc, title_boost))
            .collect();
        Self::from_analyzed(docs, normalizer, policy)
    }

    /// Fit over documents that were already analyzed.
    /// The tier is chosen by the number of non-empty documents,
    /// a degenerate primary vocabulary falls back once, then to the empty index.
    pub fn from_analyzed(
        docs: Vec<AnalyzedDoc>,
        normalizer: TextNormalizer,
        policy: &VectorizerPolicy,
    ) -> Self {
        let non_empty = docs.iter().filter(|d| !d.is_empty()).count();
        let primary = policy.primary_for(non_empty);

        let fitted = if non_empty == 0 {
            Err(VocabularyError::EmptyVocabulary)
        } else {
            Self::fit_tier(&docs, &primary)
                .map(|f| (f, FitTier::Primary))
                .or_else(|e| {
                    tracing::warn!(
                        "primary vectorizer degenerated ({}), retrying with fallback ngram {:?} max_df {}",
                        e,
                        policy.fallback.ngram_range,
                        policy.fallback.max_df
                    );
                    Self::fit_tier(&docs, &policy.fallback).map(|f| (f, FitTier::Fallback))
                })
        };

        let processed_texts = docs.iter().map(|d| d.text.clone()).collect();
        match fitted {
            Ok(((terms, idf, document_vectors), tier)) => {
                let params = match tier {
                    FitTier::Primary => primary,
                    _ => policy.fallback,
                };
                tracing::debug!(
                    "fitted vocabulary: tier {:?}, {} documents ({} non-empty), {} terms",
                    tier,
                    docs.len(),
                    non_empty,
                    terms.len()
                );
                Self {
                    terms,
                    idf,
                    document_vectors,
                    processed_texts,
                    params: Some(params),
                    tier,
                    normalizer,
                    _marker: PhantomData,
                }
            }
            Err(e) => {
                tracing::warn!("vocabulary is empty ({}), every score will be 0", e);
                Self {
                    terms: IndexSet::new(),
                    idf: Vec::new(),
                    document_vectors: vec![SparseVec::new(0); docs.len()],
                    processed_texts,
                    params: None,
                    tier: FitTier::Empty,
                    normalizer,
                    _marker: PhantomData,
                }
            }
        }
    }

    /// Build one tier: count, prune, cap, weight.
    #[allow(clippy::type_complexity)]
    fn fit_tier(
        docs: &[AnalyzedDoc],
        params: &VectorizerParams,
    ) -> Result<(IndexSet<Box<str>>, Vec<N>, Vec<SparseVec<N>>), VocabularyError> {
        let freqs: Vec<TermFrequency> = docs
            .iter()
            .map(|doc| {
                let mut freq = TermFrequency::new();
                for field in &doc.fields {
                    freq.add_ngrams(field, params.ngram_range);
                }
                freq
            })
            .collect();
        let stats = CorpusStats::from_documents(&freqs);
        if stats.vocab_size() == 0 {
            return Err(VocabularyError::EmptyVocabulary);
        }

        let doc_num = stats.get_doc_num();
        let max_doc_count = params.max_df * doc_num as f64;
        let mut kept: Vec<(&str, u64)> = stats
            .iter()
            .filter(|&(_, df)| df >= params.min_df as u64 && df as f64 <= max_doc_count)
            .map(|(term, _)| (term, stats.get_total_count(term)))
            .collect();
        if kept.is_empty() {
            return Err(VocabularyError::AllTermsPruned {
                max_df: params.max_df,
                documents: doc_num as usize,
            });
        }

        if kept.len() > params.max_features {
            kept.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            kept.truncate(params.max_features);
        }
        let mut names: Vec<&str> = kept.into_iter().map(|(term, _)| term).collect();
        names.sort_unstable();
        let terms: IndexSet<Box<str>> = names.into_iter().map(Box::from).collect();

        let idf = E::idf_vec(&stats, &terms);
        let document_vectors = freqs
            .par_iter()
            .map(|freq| E::tfidf_vec(freq, &terms, &idf))
            .collect();
        Ok((terms, idf, document_vectors))
    }
}

/// Read access
impl<N, E> VocabularyIndex<N, E>
where
    N: Float + Into<f64> + Send + Sync,
    E: TFIDFEngine<N>,
{
    /// number of rows
    #[inline]
    pub fn n_documents(&self) -> usize {
        self.document_vectors.len()
    }

    /// number of columns
    #[inline]
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// true when the index has zero columns and carries no ranking signal
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn tier(&self) -> FitTier {
        self.tier
    }

    /// parameters of the tier that produced this index, `None` when empty
    #[inline]
    pub fn params(&self) -> Option<&VectorizerParams> {
        self.params.as_ref()
    }

    #[inline]
    pub fn terms(&self) -> &IndexSet<Box<str>> {
        &self.terms
    }

    #[inline]
    pub fn term(&self, column: usize) -> Option<&str> {
        self.terms.get_index(column).map(|t| t.as_ref())
    }

    #[inline]
    pub fn idf(&self) -> &[N] {
        &self.idf
    }

    #[inline]
    pub fn document_vector(&self, doc: usize) -> Option<&SparseVec<N>> {
        self.document_vectors.get(doc)
    }

    #[inline]
    pub fn document_vectors(&self) -> &[SparseVec<N>] {
        &self.document_vectors
    }

    /// normalized text that was weighted for `doc`
    #[inline]
    pub fn processed_text(&self, doc: usize) -> Option<&str> {
        self.processed_texts.get(doc).map(|s| s.as_str())
    }

    #[inline]
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// number of documents with a non-zero weight in `column`
    pub fn document_frequency(&self, column: usize) -> usize {
        self.document_vectors
            .iter()
            .filter(|v| !v.get(column).is_zero())
            .count()
    }
}

/// Projection into the fitted space
impl<N, E> VocabularyIndex<N, E>
where
    N: Float + Into<f64> + Send + Sync,
    E: TFIDFEngine<N>,
{
    /// Project token fields with the fitted idf weights.
    /// Terms outside the vocabulary are ignored.
    ///
    /// # Arguments
    /// * `fields` - normalized token runs, n-grams stay inside each run
    ///
    /// # Returns
    /// * `SparseVec<N>` - unit vector, or zero when nothing matched
    pub fn project_fields<T>(&self, fields: &[Vec<T>]) -> SparseVec<N>
    where
        T: AsRef<str>,
    {
        let Some(params) = self.params else {
            return SparseVec::new(0);
        };
        let mut freq = TermFrequency::new();
        for field in fields {
            freq.add_ngrams(field, params.ngram_range);
        }
        let vec = E::tfidf_vec(&freq, &self.terms, &self.idf);
        tracing::debug!(
            "projected {} distinct terms, {} in vocabulary",
            freq.term_num(),
            vec.nnz()
        );
        vec
    }

    /// Normalize a query the way document text is normalized and project it
    pub fn project_query(&self, query: &str) -> SparseVec<N> {
        let tokens = self.normalizer.tokens(query);
        self.project_fields(&[tokens])
    }
}

/// Prepare one document for weighting.
///
/// The fields are `[title, title, abstract]` with `title_boost`, else
/// `[title, abstract]`. When nothing survives normalization, the raw
/// lowercased title is used, split into alphabetic tokens no shorter than
/// the normalizer's minimum token length.
pub fn analyze_document(
    normalizer: &TextNormalizer,
    doc: &Document,
    title_boost: bool,
) -> AnalyzedDoc {
    let title = normalizer.tokens(&doc.title);
    let abstract_tokens = normalizer.tokens(&doc.abstract_text);
    let fields = if title_boost {
        vec![title.clone(), title, abstract_tokens]
    } else {
        vec![title, abstract_tokens]
    };
    let analyzed = AnalyzedDoc {
        text: join_fields(&fields),
        fields,
    };
    if !analyzed.text.is_empty() {
        return analyzed;
    }

    let raw_title = doc.title.to_lowercase();
    let min_len = normalizer.min_token_len();
    let tokens: Vec<String> = raw_title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= min_len && t.chars().all(|c| c.is_ascii_alphabetic()))
        .filter(|t| !normalizer.is_stop_word(t))
        .map(str::to_string)
        .collect();
    AnalyzedDoc {
        text: raw_title,
        fields: vec![tokens],
    }
}

/// Join non-empty token runs with single spaces
pub fn join_fields(fields: &[Vec<String>]) -> String {
    fields
        .iter()
        .filter(|f| !f.is_empty())
        .map(|f| f.join(" "))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::sync::Arc;

    use super::*;
    use crate::config::NormalizerConfig;
    use crate::error::LemmatizeError;
    use crate::vectorizer::analyzer::lemma::Lemmatizer;

    /// maps every token to a single letter, so nothing survives normalization
    struct Collapse;

    impl Lemmatizer for Collapse {
        fn lemmatize<'a>(&self, _token: &'a str) -> Result<Cow<'a, str>, LemmatizeError> {
            Ok(Cow::Borrowed("x"))
        }
    }

    fn doc(title: &str, abstract_text: &str) -> Document {
        Document::new(title, abstract_text)
    }

    #[test]
    fn columns_are_alphabetical_and_rows_unit() {
        let corpus = vec![
            doc("Graph neural networks", "message passing over graph structure"),
            doc("Protein folding", "structure prediction with deep networks"),
        ];
        let index = VocabularyIndex::fit(&corpus, true);
        assert_eq!(index.tier(), FitTier::Primary);
        assert_eq!(index.n_documents(), 2);
        let names: Vec<&str> = index.terms().iter().map(|t| t.as_ref()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(index.terms().contains("graph neural"));
        assert!(index.terms().contains("network"));
        for row in index.document_vectors() {
            assert!((row.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn bigrams_do_not_cross_fields() {
        let corpus = vec![doc("alpha beta", "gamma delta")];
        let index = VocabularyIndex::fit(&corpus, true);
        assert!(index.terms().contains("alpha beta"));
        assert!(index.terms().contains("gamma delta"));
        assert!(!index.terms().contains("beta alpha"));
        assert!(!index.terms().contains("beta gamma"));
    }

    #[test]
    fn title_boost_counts_title_twice() {
        let corpus = vec![doc("kernel", "scheduler")];
        let boosted = VocabularyIndex::fit(&corpus, true);
        let plain = VocabularyIndex::fit(&corpus, false);
        let col = |i: &VocabularyIndex| i.terms().get_index_of("kernel").unwrap();
        let kernel_b = boosted.document_vector(0).unwrap().get(col(&boosted));
        let kernel_p = plain.document_vector(0).unwrap().get(col(&plain));
        assert!(kernel_b > kernel_p);
        assert_eq!(boosted.processed_text(0), Some("kernel kernel scheduler"));
    }

    #[test]
    fn empty_text_falls_back_to_raw_title() {
        let normalizer = TextNormalizer::new();
        let analyzed = analyze_document(&normalizer, &doc("The 2024 A-Z", ""), true);
        assert_eq!(analyzed.text, "the 2024 a-z");
        assert!(analyzed.is_empty());

        let corpus = vec![doc("The 2024 A-Z", ""), doc("sparse retrieval", "")];
        let index = VocabularyIndex::fit(&corpus, true);
        assert_eq!(index.n_documents(), 2);
        assert!(index.document_vector(0).unwrap().is_zero());
        assert!(!index.document_vector(1).unwrap().is_zero());
    }

    #[test]
    fn raw_title_fallback_honors_min_token_len() {
        let config = NormalizerConfig {
            min_token_len: 8,
            ..NormalizerConfig::default()
        };
        let normalizer = TextNormalizer::with_lemmatizer(&config, Arc::new(Collapse));
        assert!(normalizer.tokens("Quantum Mechanics").is_empty());

        let analyzed = analyze_document(&normalizer, &doc("Quantum Mechanics", ""), true);
        assert_eq!(analyzed.text, "quantum mechanics");
        assert_eq!(analyzed.fields, vec![vec!["mechanics".to_string()]]);
    }

    #[test]
    fn all_pruned_primary_uses_fallback() {
        // 30 identical documents: every term has df = N > 0.9 N
        let corpus: Vec<Document> = (0..30).map(|_| doc("zymurgy", "")).collect();
        let index = VocabularyIndex::fit(&corpus, true);
        assert_eq!(index.tier(), FitTier::Fallback);
        assert_eq!(index.params().unwrap().ngram_range, (1, 1));
        assert_eq!(index.n_terms(), 1);
        assert_eq!(index.idf(), &[1.0]);
        assert_eq!(index.document_frequency(0), 30);
    }

    #[test]
    fn nothing_usable_gives_empty_index() {
        let index = VocabularyIndex::fit(&[doc("", ""), doc("of the", "12 34")], true);
        assert_eq!(index.tier(), FitTier::Empty);
        assert!(index.is_empty());
        assert_eq!(index.n_documents(), 2);
        assert!(index.project_query("anything").is_zero());

        let none = VocabularyIndex::fit(&[], true);
        assert!(none.is_empty());
        assert_eq!(none.n_documents(), 0);
    }

    #[test]
    fn feature_cap_keeps_most_frequent() {
        let mut config = EngineConfig::default();
        config.vectorizer.max_features = 2;
        config.vectorizer.ngram_range = (1, 1);
        let corpus = vec![
            doc("apple apple banana", "cherry"),
            doc("apple banana", "damson"),
        ];
        let index = VocabularyIndex::fit_with_config(&corpus, &config);
        let names: Vec<&str> = index.terms().iter().map(|t| t.as_ref()).collect();
        assert_eq!(names, vec!["apple", "banana"]);
    }

    #[test]
    fn query_projection_ignores_unknown_terms() {
        let corpus = vec![doc("cat dog", "")];
        let index = VocabularyIndex::fit(&corpus, true);
        let q = index.project_query("Cats and zebras");
        assert_eq!(q.nnz(), 1);
        assert_eq!(q.len(), index.n_terms());
        assert!((q.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_precision_index() {
        let corpus = vec![doc("cat dog", "bird")];
        let index: VocabularyIndex<f32> = VocabularyIndex::build(
            &corpus,
            TextNormalizer::new(),
            &VectorizerPolicy::default(),
            false,
        );
        assert_eq!(index.tier(), FitTier::Primary);
        assert!((index.document_vector(0).unwrap().norm() - 1.0).abs() < 1e-5);
    }
}
