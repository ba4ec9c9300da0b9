use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::ranking::CbfEngine;
use crate::utils::{round2, truncate_chars};
use crate::vectorizer::VocabularyIndex;

const SAMPLE_DOCUMENTS: usize = 5;
const SAMPLE_TITLE_CHARS: usize = 60;
const SAMPLE_TEXT_CHARS: usize = 300;
const VOCABULARY_TOP_TERMS: usize = 30;
const MATRIX_DOCUMENTS: usize = 10;
const ANALYSIS_TITLE_CHARS: usize = 80;
const ANALYSIS_TOP_TERMS: usize = 8;
const ANALYSIS_SAMPLE_CHARS: usize = 150;

/// Step by step account of how a selection was weighted and scored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationReport {
    pub query: String,
    pub total_documents: usize,
    /// first documents before and after normalization
    pub preprocessing: Vec<PreprocessingSample>,
    pub vocabulary: VocabularySummary,
    /// similarity to the query, in selection order
    pub documents: Vec<DocumentSimilarity>,
    /// `documents` by descending similarity
    pub ranking: Vec<DocumentSimilarity>,
    /// pairwise similarity of the leading documents, empty for a single document
    pub similarity_matrix: Vec<Vec<f64>>,
    pub analyses: Vec<DocumentAnalysis>,
    pub statistics: ScoreStatistics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingSample {
    pub title: String,
    pub original: String,
    pub preprocessed: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabularySummary {
    pub total_terms: usize,
    pub total_documents: usize,
    /// heaviest terms by mean weight across documents
    pub top_terms: Vec<TermSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermSummary {
    pub term: String,
    pub mean_weight: f64,
    pub document_frequency: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSimilarity {
    pub title: String,
    pub authors: String,
    pub year: String,
    pub citation_count: Option<u64>,
    /// cosine similarity to the query in [0, 1]
    pub similarity: f64,
    /// score the document carried in, 0 when unset
    pub relevance_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    /// 1-based
    pub index: usize,
    pub title: String,
    pub relevance_score: f64,
    /// (term, weight rounded to 4 decimals)
    pub top_terms: Vec<(String, f64)>,
    pub preprocessed_sample: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreStatistics {
    pub average_relevance: f64,
    pub max_relevance: f64,
    pub min_relevance: f64,
    pub total_unique_terms: usize,
}

impl CbfEngine {
    /// Report the intermediate values behind scoring `selected` against `query`.
    /// An empty selection gives an empty report.
    pub fn calculation_details(&self, selected: &[Document], query: &str) -> CalculationReport {
        if selected.is_empty() {
            return CalculationReport {
                query: query.to_string(),
                ..CalculationReport::default()
            };
        }
        let index = self.fit(selected);

        let preprocessing = selected
            .iter()
            .take(SAMPLE_DOCUMENTS)
            .enumerate()
            .map(|(i, doc)| PreprocessingSample {
                title: truncate_chars(&doc.title, SAMPLE_TITLE_CHARS).to_string(),
                original: truncate_chars(
                    &format!("{} {}", doc.title, doc.abstract_text),
                    SAMPLE_TEXT_CHARS,
                )
                .to_string(),
                preprocessed: truncate_chars(
                    index.processed_text(i).unwrap_or_default(),
                    SAMPLE_TEXT_CHARS,
                )
                .to_string(),
            })
            .collect();

        let hits = index.similarity_to_query(query);
        let documents: Vec<DocumentSimilarity> = selected
            .iter()
            .enumerate()
            .map(|(i, doc)| DocumentSimilarity {
                title: doc.title.clone(),
                authors: doc.authors.clone(),
                year: doc.year.clone(),
                citation_count: doc.citation_count,
                similarity: hits.score_of(i).unwrap_or(0.0),
                relevance_score: doc.relevance_score.unwrap_or(0.0),
            })
            .collect();
        let ranking = hits
            .iter()
            .filter_map(|(i, _)| documents.get(*i).cloned())
            .collect();

        let similarity_matrix = if selected.len() > 1 {
            index
                .similarity_matrix()
                .into_iter()
                .take(MATRIX_DOCUMENTS)
                .map(|row| row.into_iter().take(MATRIX_DOCUMENTS).collect())
                .collect()
        } else {
            Vec::new()
        };

        let analyses = selected
            .iter()
            .enumerate()
            .map(|(i, doc)| DocumentAnalysis {
                index: i + 1,
                title: truncate_chars(&doc.title, ANALYSIS_TITLE_CHARS).to_string(),
                relevance_score: doc.relevance_score.unwrap_or(0.0),
                top_terms: index
                    .top_terms(i, ANALYSIS_TOP_TERMS)
                    .into_iter()
                    .map(|(t, w)| (t.to_string(), (w * 10_000.0).round() / 10_000.0))
                    .collect(),
                preprocessed_sample: preprocessed_sample(
                    index.processed_text(i).unwrap_or_default(),
                ),
            })
            .collect();

        let scores: Vec<f64> = selected.iter().map(|d| d.relevance_score.unwrap_or(0.0)).collect();
        let statistics = ScoreStatistics {
            average_relevance: round2(scores.iter().sum::<f64>() / scores.len() as f64),
            max_relevance: round2(scores.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
            min_relevance: round2(scores.iter().copied().fold(f64::INFINITY, f64::min)),
            total_unique_terms: index.n_terms(),
        };

        CalculationReport {
            query: query.to_string(),
            total_documents: selected.len(),
            preprocessing,
            vocabulary: vocabulary_summary(&index),
            documents,
            ranking,
            similarity_matrix,
            analyses,
            statistics,
        }
    }
}

fn vocabulary_summary(index: &VocabularyIndex) -> VocabularySummary {
    let n = index.n_documents();
    let mut sums = vec![0.0_f64; index.n_terms()];
    for row in index.document_vectors() {
        for (col, w) in row.raw_iter() {
            sums[col] += w;
        }
    }
    let mut columns: Vec<(usize, f64)> = sums
        .into_iter()
        .map(|s| if n > 0 { s / n as f64 } else { 0.0 })
        .enumerate()
        .collect();
    columns.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    VocabularySummary {
        total_terms: index.n_terms(),
        total_documents: n,
        top_terms: columns
            .into_iter()
            .take(VOCABULARY_TOP_TERMS)
            .filter_map(|(col, mean)| {
                Some(TermSummary {
                    term: index.term(col)?.to_string(),
                    mean_weight: mean,
                    document_frequency: index.document_frequency(col),
                })
            })
            .collect(),
    }
}

fn preprocessed_sample(text: &str) -> String {
    if text.chars().count() > ANALYSIS_SAMPLE_CHARS {
        format!("{}...", truncate_chars(text, ANALYSIS_SAMPLE_CHARS))
    } else {
        text.to_string()
    }
}
