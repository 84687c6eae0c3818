use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::correlation;
use crate::error::AnalysisError;
use crate::models::{Metric, ScatterPoint, Series, SkillCorrelation, Student};
use crate::projection;
use crate::stats;

const SCATTER_PREVIEW: usize = 10;

/// Every widget's input, computed once per loaded record set.
#[derive(Debug, Serialize)]
pub struct Dashboard<'a> {
    pub student_count: usize,
    pub averages: BTreeMap<Metric, f64>,
    pub bar: Series,
    pub scatter: Vec<ScatterPoint>,
    pub selected_student: Option<&'a Student>,
    pub radar: Series,
    pub correlations: Vec<SkillCorrelation>,
    pub insight: String,
    pub students: &'a [Student],
}

impl<'a> Dashboard<'a> {
    /// Without an explicit id the first student is selected.
    pub fn build(students: &'a [Student], selected_id: Option<&str>) -> Self {
        let selected_student = match selected_id {
            Some(id) => {
                let found = projection::select_student(students, id);
                if found.is_none() {
                    warn!(student_id = id, "selected student not found; radar left empty");
                }
                found
            }
            None => students.first(),
        };

        Self {
            student_count: students.len(),
            averages: stats::compute_averages(students).unwrap_or_default(),
            bar: projection::bar_series(students).unwrap_or_default(),
            scatter: projection::scatter_series(students),
            selected_student,
            radar: projection::radar_vector(selected_student),
            correlations: correlation::rank_correlations(students).unwrap_or_default(),
            insight: insight_or_fallback(correlation::compute_insight(students)),
            students,
        }
    }
}

pub fn insight_or_fallback(result: Result<String, AnalysisError>) -> String {
    match result {
        Ok(insight) => insight,
        Err(AnalysisError::EmptyInput) => "No data available for insights.".to_string(),
        Err(AnalysisError::NoDefinedCorrelation) => {
            "No skill metric varies across students; no correlation available.".to_string()
        }
    }
}

pub fn build_report(dashboard: &Dashboard<'_>, source: &str, generated_at: DateTime<Utc>) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Cognitive Skills & Student Performance Report");
    let _ = writeln!(
        output,
        "Generated from {} ({} students) at {}",
        source,
        dashboard.student_count,
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview Stats");

    if dashboard.averages.is_empty() {
        let _ = writeln!(output, "No students loaded.");
    } else {
        for (metric, value) in dashboard.averages.iter() {
            let _ = writeln!(output, "- {}: {:.2}", metric.label(), value);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Skill Averages");

    if dashboard.bar.is_empty() {
        let _ = writeln!(output, "No skill data available.");
    } else {
        for (metric, value) in dashboard.bar.labels.iter().zip(&dashboard.bar.values) {
            let _ = writeln!(output, "- {}: {:.2}", metric.label(), value);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Attention vs Assessment Score");

    if dashboard.scatter.is_empty() {
        let _ = writeln!(output, "No points to plot.");
    } else {
        for point in dashboard.scatter.iter().take(SCATTER_PREVIEW) {
            let _ = writeln!(output, "- ({:.2}, {:.2})", point.x, point.y);
        }
        if dashboard.scatter.len() > SCATTER_PREVIEW {
            let _ = writeln!(
                output,
                "- ... {} more",
                dashboard.scatter.len() - SCATTER_PREVIEW
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Student Profile");

    match dashboard.selected_student {
        Some(student) => {
            let _ = writeln!(
                output,
                "{} ({}, {})",
                student.name, student.class_name, student.persona
            );
            for (metric, value) in dashboard.radar.labels.iter().zip(&dashboard.radar.values) {
                let _ = writeln!(output, "- {}: {:.2}", metric.label(), value);
            }
        }
        None => {
            let _ = writeln!(output, "No student selected.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Correlation Ranking");

    if dashboard.correlations.is_empty() {
        let _ = writeln!(output, "No correlations computed.");
    } else {
        let mut ranked = dashboard.correlations.clone();
        // degenerate skills sink to the bottom, ties keep skill order
        ranked.sort_by(|a, b| match (a.coefficient, b.coefficient) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        for entry in ranked.iter() {
            match entry.coefficient {
                Some(r) => {
                    let _ = writeln!(
                        output,
                        "- {}: {:.2}",
                        entry.skill.label(),
                        correlation::round_half_up(r, 2)
                    );
                }
                None => {
                    let _ = writeln!(output, "- {}: n/a (constant)", entry.skill.label());
                }
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Insights");
    let _ = writeln!(output, "{}", dashboard.insight);

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::sample_student;
    use chrono::TimeZone;

    fn cohort() -> Vec<Student> {
        vec![
            sample_student("S1", [5.0, 1.0, 5.0, 5.0, 5.0], 2.0),
            sample_student("S2", [5.0, 2.0, 5.0, 5.0, 5.0], 4.0),
            sample_student("S3", [5.0, 3.0, 5.0, 5.0, 5.0], 6.0),
        ]
    }

    #[test]
    fn defaults_selection_to_first_student() {
        let students = cohort();
        let dashboard = Dashboard::build(&students, None);
        assert_eq!(dashboard.selected_student.map(|s| s.student_id.as_str()), Some("S1"));
        assert_eq!(dashboard.radar.values, vec![5.0, 1.0, 5.0, 5.0, 5.0]);
        assert_eq!(dashboard.scatter.len(), 3);
        assert_eq!(
            dashboard.insight,
            "Strongest correlation with assessment score: attention (1.00)"
        );
    }

    #[test]
    fn unknown_selection_leaves_radar_empty() {
        let students = cohort();
        let dashboard = Dashboard::build(&students, Some("S404"));
        assert!(dashboard.selected_student.is_none());
        assert!(dashboard.radar.is_empty());
    }

    #[test]
    fn empty_dataset_maps_to_placeholders() {
        let dashboard = Dashboard::build(&[], None);
        assert!(dashboard.averages.is_empty());
        assert!(dashboard.bar.is_empty());
        assert!(dashboard.correlations.is_empty());
        assert_eq!(dashboard.insight, "No data available for insights.");

        let report = build_report(&dashboard, "empty.csv", Utc::now());
        assert!(report.contains("No students loaded."));
        assert!(report.contains("No student selected."));
    }

    #[test]
    fn degenerate_dataset_uses_fallback_insight() {
        let students = vec![sample_student("S1", [1.0, 2.0, 3.0, 4.0, 5.0], 6.0)];
        let dashboard = Dashboard::build(&students, None);
        assert_eq!(
            dashboard.insight,
            "No skill metric varies across students; no correlation available."
        );
    }

    #[test]
    fn report_lists_sections_in_order() {
        let students = cohort();
        let dashboard = Dashboard::build(&students, Some("S2"));
        let generated_at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let report = build_report(&dashboard, "students.csv", generated_at);

        assert!(report.starts_with("# Cognitive Skills & Student Performance Report"));
        assert!(report.contains("Generated from students.csv (3 students) at 2026-03-01 09:30 UTC"));
        assert!(report.contains("- Assessment Score: 4.00"));
        assert!(report.contains("- Attention: 2.00"));
        assert!(report.contains("- (3.00, 6.00)"));

        let ranking = report.find("## Correlation Ranking").unwrap();
        let attention = report[ranking..].find("- Attention: 1.00").unwrap();
        let constant = report[ranking..].find("- Comprehension: n/a (constant)").unwrap();
        assert!(attention < constant);
        assert!(report.trim_end().ends_with("attention (1.00)"));
    }

    #[test]
    fn report_sections_use_display_labels() {
        let students = vec![
            sample_student("S1", [1.0, 2.0, 3.0, 4.0, 5.0], 10.0),
            sample_student("S2", [2.0, 1.0, 5.0, 3.0, 9.0], 20.0),
            sample_student("S3", [4.0, 3.0, 4.0, 1.0, 7.0], 25.0),
        ];
        let dashboard = Dashboard::build(&students, None);
        let report = build_report(&dashboard, "students.csv", Utc::now());

        let insights = report.find("## Insights").unwrap();
        let body = &report[..insights];
        assert!(!body.contains("engagement_time"));
        assert!(!body.contains("- comprehension:"));
        assert_eq!(body.matches("- Engagement Time:").count(), 4);
    }

    #[test]
    fn serializes_metric_keys() {
        let students = cohort();
        let dashboard = Dashboard::build(&students, None);
        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["student_count"], 3);
        assert_eq!(json["averages"]["attention"], 2.0);
        assert_eq!(json["bar"]["labels"][4], "engagement_time");
        assert_eq!(json["students"][0]["class"], "10A");
        assert_eq!(json["correlations"][0]["coefficient"], serde_json::Value::Null);
    }
}
