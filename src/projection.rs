use crate::error::AnalysisError;
use crate::models::{Metric, ScatterPoint, Series, Student, SKILLS};
use crate::stats;

/// Mean of each skill across all students, in skill order.
pub fn bar_series(students: &[Student]) -> Result<Series, AnalysisError> {
    if students.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    Ok(Series {
        labels: SKILLS.to_vec(),
        values: SKILLS
            .iter()
            .map(|&skill| stats::metric_mean(students, skill))
            .collect(),
    })
}

/// One (attention, assessment score) point per student, in input order.
pub fn scatter_series(students: &[Student]) -> Vec<ScatterPoint> {
    students
        .iter()
        .map(|s| ScatterPoint {
            x: s.metric(Metric::Attention),
            y: s.metric(Metric::AssessmentScore),
        })
        .collect()
}

/// Skill profile of the selected student. No selection yields an empty series.
pub fn radar_vector(student: Option<&Student>) -> Series {
    match student {
        Some(student) => Series {
            labels: SKILLS.to_vec(),
            values: SKILLS.iter().map(|&skill| student.metric(skill)).collect(),
        },
        None => Series::default(),
    }
}

pub fn select_student<'a>(students: &'a [Student], student_id: &str) -> Option<&'a Student> {
    students.iter().find(|s| s.student_id == student_id)
}
