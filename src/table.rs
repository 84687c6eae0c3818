use std::cmp::Ordering;
use std::fmt::Write;

use crate::models::{Metric, Student};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    StudentId,
    Name,
    Class,
    Persona,
    Metric(Metric),
}

impl std::str::FromStr for SortColumn {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "student_id" | "id" => Ok(SortColumn::StudentId),
            "name" => Ok(SortColumn::Name),
            "class" => Ok(SortColumn::Class),
            "persona" => Ok(SortColumn::Persona),
            other => Metric::from_key(other)
                .map(SortColumn::Metric)
                .ok_or_else(|| format!("unknown sort column: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Case-insensitive substring match over the descriptive fields.
pub fn filter_students<'a>(students: &'a [Student], query: &str) -> Vec<&'a Student> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return students.iter().collect();
    }

    students
        .iter()
        .filter(|s| {
            [
                Some(s.student_id.as_str()),
                Some(s.name.as_str()),
                Some(s.class_name.as_str()),
                Some(s.persona.as_str()),
                s.email.as_deref(),
                s.course.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

pub fn sort_students(rows: &mut [&Student], column: SortColumn, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, column);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn compare(a: &Student, b: &Student, column: SortColumn) -> Ordering {
    match column {
        SortColumn::StudentId => a.student_id.cmp(&b.student_id),
        SortColumn::Name => a.name.cmp(&b.name),
        SortColumn::Class => a.class_name.cmp(&b.class_name),
        SortColumn::Persona => a.persona.cmp(&b.persona),
        SortColumn::Metric(metric) => a.metric(metric).total_cmp(&b.metric(metric)),
    }
}

pub fn render_table(rows: &[&Student], query_active: bool) -> String {
    let mut output = String::new();

    if rows.is_empty() {
        let message = if query_active {
            "No matching students found"
        } else {
            "No students"
        };
        let _ = writeln!(output, "{message}");
        return output;
    }

    let _ = write!(output, "{:<10} {:<20} {:<8} {:<18}", "ID", "Name", "Class", "Persona");
    for metric in Metric::ALL {
        let _ = write!(output, " {:>16}", metric.label());
    }
    let _ = writeln!(output);

    for student in rows {
        let _ = write!(
            output,
            "{:<10} {:<20} {:<8} {:<18}",
            student.student_id, student.name, student.class_name, student.persona
        );
        for metric in Metric::ALL {
            let _ = write!(output, " {:>16.2}", student.metric(metric));
        }
        let _ = writeln!(output);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::sample_student;

    fn roster() -> Vec<Student> {
        let mut a = sample_student("S1", [50.0; 5], 70.0);
        a.name = "Avery Lee".to_string();
        a.persona = "Steady Learner".to_string();
        let mut b = sample_student("S2", [60.0; 5], 90.0);
        b.name = "Jules Moreno".to_string();
        b.email = Some("jules@example.com".to_string());
        let mut c = sample_student("S3", [40.0; 5], 55.0);
        c.name = "Kiara Patel".to_string();
        c.course = Some("Biology".to_string());
        vec![a, b, c]
    }

    #[test]
    fn blank_query_keeps_everything_in_order() {
        let students = roster();
        let ids: Vec<_> = filter_students(&students, "  ")
            .iter()
            .map(|s| s.student_id.as_str())
            .collect();
        assert_eq!(ids, vec!["S1", "S2", "S3"]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let students = roster();
        assert_eq!(filter_students(&students, "JULES@")[0].student_id, "S2");
        assert_eq!(filter_students(&students, "biology")[0].student_id, "S3");
        assert_eq!(filter_students(&students, "steady").len(), 1);
        assert!(filter_students(&students, "nobody").is_empty());
    }

    #[test]
    fn sorts_by_metric_descending() {
        let students = roster();
        let mut rows = filter_students(&students, "");
        sort_students(
            &mut rows,
            SortColumn::Metric(Metric::AssessmentScore),
            SortDirection::Descending,
        );
        let ids: Vec<_> = rows.iter().map(|s| s.student_id.as_str()).collect();
        assert_eq!(ids, vec!["S2", "S1", "S3"]);
    }

    #[test]
    fn parses_sort_columns() {
        assert_eq!("name".parse::<SortColumn>(), Ok(SortColumn::Name));
        assert_eq!(
            "engagement_time".parse::<SortColumn>(),
            Ok(SortColumn::Metric(Metric::EngagementTime))
        );
        assert!("email".parse::<SortColumn>().is_err());
    }

    #[test]
    fn empty_table_messages() {
        assert_eq!(render_table(&[], false), "No students\n");
        assert_eq!(render_table(&[], true), "No matching students found\n");
    }

    #[test]
    fn renders_header_and_rows() {
        let students = roster();
        let rows = filter_students(&students, "");
        let output = render_table(&rows, false);
        assert_eq!(output.lines().count(), 4);
        assert!(output.contains("Engagement Time"));
        assert!(output.contains("Kiara Patel"));
        assert!(output.contains("90.00"));
    }
}
