//! This crate is a Content-Based Filtering engine for academic paper records,
//! built on an adaptive TF-IDF vectorizer.
//!
//! Every ranking call fits its own vocabulary from the documents handed to it,
//! so there is no shared index and no state between calls.

pub mod config;
pub mod document;
pub mod error;
pub mod evaluation;
pub mod ranking;
pub mod utils;
pub mod vectorizer;

/// Content-Based Filtering engine
/// The top-level struct of this crate.
/// It ranks a corpus against a query, recommends candidates from a selection
/// of documents, and finds documents similar to a reference.
///
/// Internally, it holds:
/// - The engine configuration
/// - A text normalizer built from that configuration
///
/// Free functions `rank_by_relevance`, `recommend_from_selection` and
/// `find_similar_to` do the same with the default configuration.
pub use ranking::CbfEngine;
pub use ranking::{find_similar_to, rank_by_relevance, recommend_from_selection};

/// Calculation details
/// Intermediate values (normalized text, vocabulary, similarities) of one
/// scoring run, for display.
///
/// # Serialization
/// Supported.
pub use ranking::details::CalculationReport;

/// Paper record and its ranked copy
///
/// # Serialization
/// Supported. `RankedResult` serializes flat: the document fields plus
/// `relevance_rank`.
pub use document::{Document, RankedResult, Scored};

/// Vocabulary Index
/// Term-weight matrix of one corpus snapshot, immutable after `fit`.
///
/// Internally, it holds:
/// - The vocabulary (term to column)
/// - The IDF vector
/// - One unit-norm sparse TF-IDF vector per document
/// - The vectorizer tier that produced it
///
/// `VocabularyIndex<N, E>` has the following generic parameters:
/// - `N`: weight type (f64, f32)
/// - `E`: TF-IDF calculation engine type (e.g., DefaultTFIDFEngine)
pub use vectorizer::{FitTier, VocabularyIndex};

/// Text normalizer
/// Lowercases, strips URLs and non-letters, drops stop words and short
/// tokens, lemmatizes. Idempotent.
pub use vectorizer::analyzer::TextNormalizer;

/// Lemmatizer seam of the normalizer, with the built-in rule based implementation
pub use vectorizer::analyzer::lemma::{Lemmatizer, RuleLemmatizer};

/// Term Frequency structure
/// Manages raw term (and n-gram) counts of one document or query.
pub use vectorizer::term::TermFrequency;

/// TF-IDF Calculation Engine Trait
/// Defines the behavior of a TF-IDF calculation engine.
///
/// Custom engines can be implemented and plugged into `VocabularyIndex`.
/// A default implementation, `DefaultTFIDFEngine`, is provided.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Similarity results and pairwise explanations
pub use vectorizer::evaluate::{explain::Explanation, scoring::Hits};

/// Evaluation of ranked results
pub use evaluation::{
    bucket_by_threshold, evaluate_by_titles, precision_recall_f, summarize, EvaluationReport,
    EvaluationSummary, RelevanceTier, RetrievalMetrics,
};

/// Engine configuration
///
/// # Deserialization
/// Supported, missing keys take their defaults.
pub use config::EngineConfig;

pub use error::{ConfigError, LemmatizeError, VocabularyError};
