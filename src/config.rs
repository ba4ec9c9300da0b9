use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Engine configuration.
/// Every constant the ranking pipeline depends on lives here,
/// `Default` reproduces the stock behaviour.
///
/// # Examples
/// ```
/// use cbf_recommender::EngineConfig;
/// let config = EngineConfig::from_json_str(r#"{ "title_boost": false }"#).unwrap();
/// assert!(!config.title_boost);
/// assert_eq!(config.vectorizer.max_features, 5000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub normalizer: NormalizerConfig,
    pub vectorizer: VectorizerPolicy,
    /// count the title twice when weighting a document
    pub title_boost: bool,
    pub explain: ExplainConfig,
    pub evaluation: EvaluationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            vectorizer: VectorizerPolicy::default(),
            title_boost: true,
            explain: ExplainConfig::default(),
            evaluation: EvaluationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document (missing keys take defaults) and validate it
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.normalizer.min_token_len == 0 {
            return Err(ConfigError::Invalid("normalizer.min_token_len must be >= 1".into()));
        }
        if self.vectorizer.tiers.is_empty() {
            return Err(ConfigError::Invalid("vectorizer.tiers must not be empty".into()));
        }
        for tier in &self.vectorizer.tiers {
            self.vectorizer.params_for(tier).validate("vectorizer.tiers")?;
        }
        self.vectorizer.fallback.validate("vectorizer.fallback")?;
        let t = &self.evaluation.thresholds;
        if !(0.0..=100.0).contains(&t.medium)
            || !(0.0..=100.0).contains(&t.high)
            || t.medium > t.high
        {
            return Err(ConfigError::Invalid(format!(
                "evaluation.thresholds must satisfy 0 <= medium ({}) <= high ({}) <= 100",
                t.medium,
                t.high
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// tokens shorter than this are dropped
    pub min_token_len: usize,
    /// stop words added on top of the built-in multilingual set
    pub extra_stop_words: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            min_token_len: 3,
            extra_stop_words: Vec::new(),
        }
    }
}

/// Parameters of one vectorizer configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorizerParams {
    /// (min n, max n) of word n-grams
    pub ngram_range: (usize, usize),
    /// terms in fewer documents are pruned
    pub min_df: usize,
    /// terms in more than `max_df * N` documents are pruned
    pub max_df: f64,
    /// keep at most this many features, highest corpus count first
    pub max_features: usize,
}

impl VectorizerParams {
    fn validate(&self, path: &str) -> Result<(), ConfigError> {
        let (lo, hi) = self.ngram_range;
        if lo == 0 || lo > hi {
            return Err(ConfigError::Invalid(format!("{path}: invalid ngram_range ({lo}, {hi})")));
        }
        if self.min_df == 0 {
            return Err(ConfigError::Invalid(format!("{path}: min_df must be >= 1")));
        }
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "{path}: max_df must be in (0, 1], got {}",
                self.max_df
            )));
        }
        if self.max_features == 0 {
            return Err(ConfigError::Invalid(format!("{path}: max_features must be >= 1")));
        }
        Ok(())
    }
}

/// Document-frequency bounds used up to a corpus size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeTier {
    /// applies while the number of non-empty documents is <= this; `None` is unbounded
    pub max_documents: Option<usize>,
    pub min_df: usize,
    pub max_df: f64,
}

/// Adaptive vectorizer configuration.
/// The primary tier is chosen by corpus size, the fallback is tried once
/// when the primary tier prunes every term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerPolicy {
    pub ngram_range: (usize, usize),
    pub max_features: usize,
    /// checked in order, the first matching tier wins
    pub tiers: Vec<SizeTier>,
    pub fallback: VectorizerParams,
}

impl Default for VectorizerPolicy {
    fn default() -> Self {
        let tier = |max_documents, max_df| SizeTier { max_documents, min_df: 1, max_df };
        Self {
            ngram_range: (1, 2),
            max_features: 5000,
            tiers: vec![tier(Some(5), 1.0), tier(Some(20), 0.95), tier(None, 0.9)],
            fallback: VectorizerParams {
                ngram_range: (1, 1),
                min_df: 1,
                max_df: 1.0,
                max_features: 1000,
            },
        }
    }
}

impl VectorizerPolicy {
    fn params_for(&self, tier: &SizeTier) -> VectorizerParams {
        VectorizerParams {
            ngram_range: self.ngram_range,
            min_df: tier.min_df,
            max_df: tier.max_df,
            max_features: self.max_features,
        }
    }

    /// Primary parameters for a corpus with `documents` non-empty documents
    pub fn primary_for(&self, documents: usize) -> VectorizerParams {
        match self
            .tiers
            .iter()
            .find(|t| t.max_documents.map_or(true, |max| documents <= max))
            .or(self.tiers.last())
        {
            Some(tier) => self.params_for(tier),
            None => VectorizerParams {
                ngram_range: self.ngram_range,
                min_df: 1,
                max_df: 1.0,
                max_features: self.max_features,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainConfig {
    /// each document contributes only its own top terms
    pub top_terms_per_document: usize,
    pub top_contributing: usize,
    pub unique_terms: usize,
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            top_terms_per_document: 20,
            top_contributing: 5,
            unique_terms: 5,
        }
    }
}

/// Relevance tier boundaries on the 0-100 score scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    /// score >= high is high relevance
    pub high: f64,
    /// medium <= score < high is medium relevance
    pub medium: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self { high: 70.0, medium: 40.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub thresholds: TierThresholds,
    /// mean score under this suggests broadening the query
    pub low_mean_score: f64,
    /// high-tier percentage under this is reported
    pub min_high_percentage: f64,
    /// fewer results than this suggests broader terms
    pub min_results: usize,
    /// title truncation in report listings
    pub title_width: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            thresholds: TierThresholds::default(),
            low_mean_score: 30.0,
            min_high_percentage: 20.0,
            min_results: 10,
            title_width: 80,
        }
    }
}
