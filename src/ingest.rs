use std::collections::HashSet;
use std::io;
use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};

use crate::error::IngestError;
use crate::models::{Metric, Student};

pub fn load_students(csv_path: &Path) -> anyhow::Result<Vec<Student>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let students = read_students(file)
        .with_context(|| format!("failed to read students from {}", csv_path.display()))?;
    info!(count = students.len(), path = %csv_path.display(), "loaded student records");
    Ok(students)
}

/// Parse a header-keyed CSV. Column order is free and `email`/`course` are optional.
pub fn read_students<R: io::Read>(source: R) -> anyhow::Result<Vec<Student>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut students = Vec::new();
    let mut seen = HashSet::new();

    for (index, result) in reader.deserialize::<Student>().enumerate() {
        // header is line 1
        let row = index + 2;
        let student = result.with_context(|| format!("invalid student row {row}"))?;

        if let Some(metric) = Metric::ALL
            .into_iter()
            .find(|&metric| !student.metric(metric).is_finite())
        {
            return Err(IngestError::NonFiniteMetric {
                row,
                student_id: student.student_id,
                metric,
            }
            .into());
        }

        if !seen.insert(student.student_id.clone()) {
            warn!(student_id = %student.student_id, row, "duplicate student id");
        }
        students.push(student);
    }

    Ok(students)
}
