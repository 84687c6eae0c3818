use tracing::debug;

use crate::error::AnalysisError;
use crate::models::{Metric, SkillCorrelation, Student, SKILLS, TARGET};
use crate::stats;

/// Pearson product-moment correlation of two equal-length samples.
///
/// Returns `None` when the samples are empty, differ in length, or either one
/// has no variance, since the coefficient is undefined there.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || is_constant(xs) || is_constant(ys) {
        return None;
    }
    let mean_x = stats::mean(xs)?;
    let mean_y = stats::mean(ys)?;

    // r is scale invariant; normalising deviations keeps squares in range
    let scale_x = max_deviation(xs, mean_x);
    let scale_y = max_deviation(ys, mean_y);
    if !(scale_x > 0.0 && scale_y > 0.0) {
        return None;
    }

    let mut num = 0.0;
    let mut den_x = 0.0;
    let mut den_y = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = (x - mean_x) / scale_x;
        let dy = (y - mean_y) / scale_y;
        num += dx * dy;
        den_x += dx * dx;
        den_y += dy * dy;
    }

    let den = den_x.sqrt() * den_y.sqrt();
    if den.is_finite() && den > 0.0 {
        Some((num / den).clamp(-1.0, 1.0))
    } else {
        None
    }
}

fn max_deviation(values: &[f64], mean: f64) -> f64 {
    values
        .iter()
        .map(|v| (v - mean).abs())
        .fold(0.0, f64::max)
}

fn is_constant(values: &[f64]) -> bool {
    match values.first() {
        Some(first) => values.iter().all(|v| v == first),
        None => true,
    }
}

fn column(students: &[Student], metric: Metric) -> Vec<f64> {
    students.iter().map(|s| s.metric(metric)).collect()
}

/// Correlation of every skill with the assessment score, in skill order.
pub fn rank_correlations(students: &[Student]) -> Result<Vec<SkillCorrelation>, AnalysisError> {
    if students.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let target = column(students, TARGET);
    Ok(SKILLS
        .iter()
        .map(|&skill| {
            let coefficient = pearson(&column(students, skill), &target);
            match coefficient {
                Some(r) => debug!(skill = skill.key(), r, "computed correlation"),
                None => debug!(skill = skill.key(), "skipping degenerate skill"),
            }
            SkillCorrelation { skill, coefficient }
        })
        .collect())
}

/// Skill with the highest correlation. Ties keep the earlier skill.
pub fn strongest_predictor(students: &[Student]) -> Result<SkillCorrelation, AnalysisError> {
    let mut best: Option<SkillCorrelation> = None;
    for candidate in rank_correlations(students)? {
        let Some(r) = candidate.coefficient else {
            continue;
        };
        let beats = match best.and_then(|b| b.coefficient) {
            Some(best_r) => r > best_r,
            None => true,
        };
        if beats {
            best = Some(candidate);
        }
    }
    best.ok_or(AnalysisError::NoDefinedCorrelation)
}

pub fn compute_insight(students: &[Student]) -> Result<String, AnalysisError> {
    let best = strongest_predictor(students)?;
    let r = best
        .coefficient
        .ok_or(AnalysisError::NoDefinedCorrelation)?;
    Ok(format_insight(best.skill, r))
}

pub fn format_insight(skill: Metric, r: f64) -> String {
    format!(
        "Strongest correlation with assessment score: {} ({:.2})",
        skill.key(),
        round_half_up(r, 2)
    )
}

pub fn round_half_up(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}
