use serde::{Deserialize, Serialize};

use crate::utils::round2;

/// Paper record produced by retrieval adapters.
/// The engine reads it, and only ever writes `relevance_score` on a copy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    /// stable within one request, usually the position in the corpus
    pub id: usize,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub authors: String,
    pub year: String,
    pub source: String,
    /// `None` when the source did not report citations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation_count: Option<u64>,
    /// similarity x 100 in [0, 100], `None` until ranked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

impl Document {
    pub fn new(title: impl Into<String>, abstract_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            abstract_text: abstract_text.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: usize) -> Self {
        self.id = id;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_relevance_score(mut self, score: f64) -> Self {
        self.relevance_score = Some(score);
        self
    }

    /// Title compared case-insensitively, surrounding whitespace ignored
    #[inline]
    pub fn title_key(&self) -> String {
        self.title.trim().to_lowercase()
    }
}

/// Assign positional ids `0..n` in corpus order
pub fn with_positional_ids(docs: impl IntoIterator<Item = Document>) -> Vec<Document> {
    docs.into_iter().enumerate().map(|(i, d)| d.with_id(i)).collect()
}

/// A ranked copy of a document.
/// Serializes as the document's fields plus `relevance_rank`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    #[serde(flatten)]
    pub document: Document,
    /// 1-based position in the returned ordering
    pub relevance_rank: usize,
}

impl RankedResult {
    /// Copy `document` and attach a score and rank
    ///
    /// # Arguments
    /// * `document` - source record, left untouched
    /// * `similarity` - cosine similarity in [0, 1]
    /// * `rank` - 1-based rank
    pub fn new(document: &Document, similarity: f64, rank: usize) -> Self {
        let mut document = document.clone();
        document.relevance_score = Some(round2(similarity * 100.0));
        Self {
            document,
            relevance_rank: rank,
        }
    }

    /// relevance score on the 0-100 scale
    #[inline]
    pub fn relevance_score(&self) -> f64 {
        self.document.relevance_score.unwrap_or(0.0)
    }
}

/// Anything carrying a relevance score on the 0-100 scale.
/// Evaluation works on this, not on a concrete record type.
pub trait Scored {
    /// unset scores read as 0
    fn relevance_score(&self) -> f64;
    fn title(&self) -> &str;
    fn source(&self) -> &str;
}

impl Scored for Document {
    fn relevance_score(&self) -> f64 {
        self.relevance_score.unwrap_or(0.0)
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn source(&self) -> &str {
        &self.source
    }
}

impl Scored for RankedResult {
    fn relevance_score(&self) -> f64 {
        RankedResult::relevance_score(self)
    }

    fn title(&self) -> &str {
        &self.document.title
    }

    fn source(&self) -> &str {
        &self.document.source
    }
}
