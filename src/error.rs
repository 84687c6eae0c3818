use thiserror::Error;

use crate::models::Metric;

/// Failures of the statistics core. Both are recoverable and should be mapped
/// to a "no data" state by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("no student records to analyse")]
    EmptyInput,
    #[error("every skill metric is constant across the records; no correlation is defined")]
    NoDefinedCorrelation,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("row {row} ({student_id}): {metric} is not a finite number")]
    NonFiniteMetric {
        row: usize,
        student_id: String,
        metric: Metric,
    },
}
