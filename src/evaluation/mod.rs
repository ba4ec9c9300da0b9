//! Evaluation of ranked result lists.
//! Works on anything implementing [`Scored`](crate::document::Scored).

pub mod metrics;
pub mod report;
pub mod tiers;

pub use metrics::{evaluate_by_titles, f_beta, precision_recall_f, RetrievalMetrics};
pub use report::{summarize, summarize_with, Advisory, EvaluationReport, ScoreSummary, TopResult};
pub use tiers::{bucket_by_threshold, bucket_by_threshold_with, EvaluationSummary, RelevanceTier};
