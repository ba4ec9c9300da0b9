use serde::{Deserialize, Serialize};

use crate::config::TierThresholds;
use crate::document::Scored;
use crate::utils::round2;

/// Relevance tier of a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelevanceTier {
    High,
    Medium,
    Low,
}

impl RelevanceTier {
    /// high >= `high`, medium in [`medium`, `high`), low below
    #[inline]
    pub fn of(score: f64, thresholds: &TierThresholds) -> Self {
        if score >= thresholds.high {
            RelevanceTier::High
        } else if score >= thresholds.medium {
            RelevanceTier::Medium
        } else {
            RelevanceTier::Low
        }
    }
}

/// Tier counts of a result list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub total: usize,
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
    /// percentages to 2 decimals, summing to exactly 100 when `total > 0`
    pub high_percentage: f64,
    pub medium_percentage: f64,
    pub low_percentage: f64,
    /// mean relevance score, 2 decimals
    pub mean_score: f64,
}

impl EvaluationSummary {
    pub fn count(&self, tier: RelevanceTier) -> usize {
        match tier {
            RelevanceTier::High => self.high_count,
            RelevanceTier::Medium => self.medium_count,
            RelevanceTier::Low => self.low_count,
        }
    }

    pub fn percentage(&self, tier: RelevanceTier) -> f64 {
        match tier {
            RelevanceTier::High => self.high_percentage,
            RelevanceTier::Medium => self.medium_percentage,
            RelevanceTier::Low => self.low_percentage,
        }
    }
}

/// Bucket results into the default tiers (high >= 70, medium >= 40)
pub fn bucket_by_threshold<T: Scored>(results: &[T]) -> EvaluationSummary {
    bucket_by_threshold_with(results, &TierThresholds::default())
}

/// Bucket results into relevance tiers
///
/// # Arguments
/// * `results` - scored records, unset scores count as 0
/// * `thresholds` - tier boundaries
///
/// # Returns
/// * `EvaluationSummary` - all zero for an empty input
pub fn bucket_by_threshold_with<T: Scored>(
    results: &[T],
    thresholds: &TierThresholds,
) -> EvaluationSummary {
    let total = results.len();
    if total == 0 {
        return EvaluationSummary::default();
    }
    let mut counts = [0_usize; 3];
    let mut sum = 0.0;
    for r in results {
        let score = r.relevance_score();
        sum += score;
        let slot = match RelevanceTier::of(score, thresholds) {
            RelevanceTier::High => 0,
            RelevanceTier::Medium => 1,
            RelevanceTier::Low => 2,
        };
        counts[slot] += 1;
    }
    let [high, medium, low] = largest_remainder_percentages(&counts);
    EvaluationSummary {
        total,
        high_count: counts[0],
        medium_count: counts[1],
        low_count: counts[2],
        high_percentage: high,
        medium_percentage: medium,
        low_percentage: low,
        mean_score: round2(sum / total as f64),
    }
}

/// Percentages in hundredths that add up to exactly 100.00.
/// Each share is floored, the leftover hundredths go to the largest
/// remainders, earlier slots first on ties.
fn largest_remainder_percentages(counts: &[usize; 3]) -> [f64; 3] {
    const SCALE: usize = 10_000;
    let total: usize = counts.iter().sum();
    if total == 0 {
        return [0.0; 3];
    }
    let mut units = [0_usize; 3];
    let mut remainders = [(0_usize, 0_usize); 3];
    for (i, &c) in counts.iter().enumerate() {
        units[i] = c * SCALE / total;
        remainders[i] = (c * SCALE % total, i);
    }
    let leftover = SCALE - units.iter().sum::<usize>();
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    for &(_, i) in remainders.iter().take(leftover) {
        units[i] += 1;
    }
    units.map(|u| u as f64 / 100.0)
}
