use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::EvaluationConfig;
use crate::document::Scored;
use crate::evaluation::tiers::{bucket_by_threshold_with, EvaluationSummary};
use crate::utils::{round2, truncate_chars};

const TOP_RESULTS: usize = 5;

/// Advisory attached to a report.
/// Informational only, nothing in the engine branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    /// mean score is low
    BroadenQuery,
    /// few results reach the high tier
    FewHighlyRelevant,
    /// the result list is short
    TryBroaderTerms,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Advisory::BroadenQuery => "consider broadening the search query",
            Advisory::FewHighlyRelevant => "few highly relevant results",
            Advisory::TryBroaderTerms => "limited number of results, try broader terms",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub average: f64,
    pub max: f64,
    pub min: f64,
    /// upper median
    pub median: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopResult {
    pub title: String,
    pub score: f64,
    pub source: String,
}

/// Evaluation report of one ranked result list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub query: String,
    pub total_results: usize,
    pub statistics: ScoreSummary,
    pub distribution: EvaluationSummary,
    pub top_results: Vec<TopResult>,
    pub advisories: Vec<Advisory>,
}

impl EvaluationReport {
    /// advisories rendered as text
    pub fn advisory_messages(&self) -> Vec<String> {
        self.advisories.iter().map(|a| a.to_string()).collect()
    }
}

/// [`summarize_with`] using the default evaluation config
pub fn summarize<T: Scored>(results: &[T], query: &str) -> EvaluationReport {
    summarize_with(results, query, &EvaluationConfig::default())
}

/// Summarize a ranked result list
///
/// # Arguments
/// * `results` - scored records in any order
/// * `query` - the query that produced them, echoed in the report
/// * `config` - tier thresholds and advisory limits
pub fn summarize_with<T: Scored>(
    results: &[T],
    query: &str,
    config: &EvaluationConfig,
) -> EvaluationReport {
    let distribution = bucket_by_threshold_with(results, &config.thresholds);

    let mut scores: Vec<f64> = results.iter().map(|r| r.relevance_score()).collect();
    scores.sort_by(f64::total_cmp);
    let statistics = match (scores.first(), scores.last()) {
        (Some(&min), Some(&max)) => ScoreSummary {
            average: distribution.mean_score,
            max: round2(max),
            min: round2(min),
            median: round2(scores[scores.len() / 2]),
        },
        _ => ScoreSummary::default(),
    };

    let mut order: Vec<&T> = results.iter().collect();
    // stable: equal scores keep input order
    order.sort_by(|a, b| b.relevance_score().total_cmp(&a.relevance_score()));
    let top_results = order
        .into_iter()
        .take(TOP_RESULTS)
        .map(|r| TopResult {
            title: truncate_chars(r.title(), config.title_width).to_string(),
            score: r.relevance_score(),
            source: if r.source().trim().is_empty() {
                "Unknown".to_string()
            } else {
                r.source().to_string()
            },
        })
        .collect();

    let mut advisories = Vec::new();
    if distribution.mean_score < config.low_mean_score {
        advisories.push(Advisory::BroadenQuery);
    }
    if distribution.high_percentage < config.min_high_percentage {
        advisories.push(Advisory::FewHighlyRelevant);
    }
    if results.len() < config.min_results {
        advisories.push(Advisory::TryBroaderTerms);
    }
    tracing::debug!(
        "evaluated {} results for {:?}: mean {}, {} advisories",
        results.len(),
        query,
        distribution.mean_score,
        advisories.len()
    );

    EvaluationReport {
        query: query.to_string(),
        total_results: results.len(),
        statistics,
        distribution,
        top_results,
        advisories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn papers(scores: &[f64]) -> Vec<Document> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &s)| Document::new(format!("Paper {}", i + 1), "").with_relevance_score(s))
            .collect()
    }

    #[test]
    fn statistics_and_top_results() {
        let report = summarize(&papers(&[55.1, 85.5, 30.2, 72.3, 45.0, 12.0]), "machine learning");
        assert_eq!(report.query, "machine learning");
        assert_eq!(report.total_results, 6);
        assert_eq!(report.statistics.max, 85.5);
        assert_eq!(report.statistics.min, 12.0);
        // sorted: 12.0 30.2 45.0 55.1 72.3 85.5, upper median
        assert_eq!(report.statistics.median, 55.1);
        assert_eq!(report.statistics.average, 50.02);

        let titles: Vec<&str> = report.top_results.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Paper 2", "Paper 4", "Paper 1", "Paper 5", "Paper 3"]);
        assert_eq!(report.top_results[0].source, "Unknown");
    }

    #[test]
    fn advisories_fire_on_weak_results() {
        let report = summarize(&papers(&[25.0, 10.0, 5.0]), "q");
        assert_eq!(
            report.advisories,
            vec![Advisory::BroadenQuery, Advisory::FewHighlyRelevant, Advisory::TryBroaderTerms]
        );
        assert_eq!(report.advisory_messages().len(), 3);
    }

    #[test]
    fn strong_results_need_no_advice() {
        let report = summarize(&papers(&[90.0; 12]), "q");
        assert!(report.advisories.is_empty());
        assert_eq!(report.distribution.high_percentage, 100.0);
    }

    #[test]
    fn empty_results_are_well_defined() {
        let report = summarize::<Document>(&[], "q");
        assert_eq!(report.total_results, 0);
        assert_eq!(report.statistics, ScoreSummary::default());
        assert!(report.top_results.is_empty());
        assert!(report.advisories.contains(&Advisory::TryBroaderTerms));
    }

    #[test]
    fn long_titles_are_truncated() {
        let docs = vec![Document::new("x".repeat(200), "")
            .with_source("arXiv")
            .with_relevance_score(50.0)];
        let report = summarize(&docs, "q");
        assert_eq!(report.top_results[0].title.chars().count(), 80);
        assert_eq!(report.top_results[0].source, "arXiv");
    }
}
