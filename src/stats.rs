use std::collections::BTreeMap;

use crate::error::AnalysisError;
use crate::models::{Metric, Student};

/// Arithmetic mean of every numeric metric over the record set.
pub fn compute_averages(students: &[Student]) -> Result<BTreeMap<Metric, f64>, AnalysisError> {
    if students.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    Ok(Metric::ALL
        .into_iter()
        .map(|metric| (metric, metric_mean(students, metric)))
        .collect())
}

/// Caller guarantees `students` is non-empty.
pub(crate) fn metric_mean(students: &[Student], metric: Metric) -> f64 {
    let total: f64 = students.iter().map(|s| s.metric(metric)).sum();
    total / students.len() as f64
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
