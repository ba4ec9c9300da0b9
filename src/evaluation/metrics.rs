use std::hash::Hash;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::document::Scored;
use crate::utils::round2;

/// Classic retrieval metrics, as fractions in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub f2: f64,
    pub relevant_retrieved: usize,
    pub total_retrieved: usize,
    pub total_relevant: usize,
}

impl RetrievalMetrics {
    /// Compute from raw counts
    ///
    /// # Arguments
    /// * `relevant_retrieved` - retrieved items that are relevant
    /// * `total_retrieved` - retrieved items
    /// * `total_relevant` - relevant items in the corpus
    pub fn from_counts(
        relevant_retrieved: usize,
        total_retrieved: usize,
        total_relevant: usize,
    ) -> Self {
        let precision = ratio(relevant_retrieved, total_retrieved);
        let recall = ratio(relevant_retrieved, total_relevant);
        Self {
            precision,
            recall,
            f1: f_beta(precision, recall, 1.0),
            f2: f_beta(precision, recall, 2.0),
            relevant_retrieved,
            total_retrieved,
            total_relevant,
        }
    }

    #[inline]
    pub fn precision_percent(&self) -> f64 {
        round2(self.precision * 100.0)
    }

    #[inline]
    pub fn recall_percent(&self) -> f64 {
        round2(self.recall * 100.0)
    }

    #[inline]
    pub fn f1_percent(&self) -> f64 {
        round2(self.f1 * 100.0)
    }

    #[inline]
    pub fn f2_percent(&self) -> f64 {
        round2(self.f2 * 100.0)
    }
}

#[inline]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// F-beta score, 0 when the denominator is 0
///
/// # Arguments
/// * `precision` - in [0, 1]
/// * `recall` - in [0, 1]
/// * `beta` - recall weight, 1 balances both, 2 favours recall
#[inline]
pub fn f_beta(precision: f64, recall: f64, beta: f64) -> f64 {
    let b2 = beta * beta;
    let den = b2 * precision + recall;
    if den == 0.0 {
        return 0.0;
    }
    (1.0 + b2) * precision * recall / den
}

/// Precision, recall, F1 and F2 of a retrieved id set against ground truth
///
/// # Arguments
/// * `retrieved` - ids returned by the system, duplicates ignored
/// * `relevant` - ground truth ids, duplicates ignored
/// * `total_relevant` - relevant documents in the corpus, `None` means `|relevant|`
///
/// # Examples
/// ```
/// use cbf_recommender::precision_recall_f;
/// let m = precision_recall_f([1, 2, 3], [2, 3, 4], Some(4));
/// assert_eq!(m.precision_percent(), 66.67);
/// assert_eq!(m.recall_percent(), 50.0);
/// assert_eq!(m.f1_percent(), 57.14);
/// ```
pub fn precision_recall_f<K, R, G>(
    retrieved: R,
    relevant: G,
    total_relevant: Option<usize>,
) -> RetrievalMetrics
where
    K: Eq + Hash,
    R: IntoIterator<Item = K>,
    G: IntoIterator<Item = K>,
{
    let retrieved: AHashSet<K> = retrieved.into_iter().collect();
    let relevant: AHashSet<K> = relevant.into_iter().collect();
    let hit = retrieved.intersection(&relevant).count();
    RetrievalMetrics::from_counts(hit, retrieved.len(), total_relevant.unwrap_or(relevant.len()))
}

/// Metrics of a result list against ground truth titles.
/// Titles match trimmed and case-insensitive, every retrieved record counts
/// towards `total_retrieved`.
pub fn evaluate_by_titles<T, S>(
    retrieved: &[T],
    relevant_titles: &[S],
    total_relevant: Option<usize>,
) -> RetrievalMetrics
where
    T: Scored,
    S: AsRef<str>,
{
    let retrieved_titles: AHashSet<String> = retrieved
        .iter()
        .map(|r| r.title().trim().to_lowercase())
        .collect();
    let relevant: AHashSet<String> = relevant_titles
        .iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .collect();
    let hit = retrieved_titles.intersection(&relevant).count();
    RetrievalMetrics::from_counts(hit, retrieved.len(), total_relevant.unwrap_or(relevant.len()))
}
