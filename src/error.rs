use thiserror::Error;

/// Failure of a single vectorizer configuration tier.
/// `VocabularyIndex::fit` consumes these to pick the next tier,
/// they never reach ranking callers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VocabularyError {
    #[error("empty vocabulary: documents contain no usable terms")]
    EmptyVocabulary,
    #[error("after pruning, no terms remain (max_df {max_df}, {documents} documents)")]
    AllTermsPruned { max_df: f64, documents: usize },
}

/// Lemmatizer rejection. The normalizer keeps the token unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LemmatizeError {
    #[error("empty token")]
    Empty,
    #[error("token is not alphabetic: {0}")]
    NonAlphabetic(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
