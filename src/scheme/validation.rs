use std::collections::HashSet;

use super::config::SchemeConfig;
use crate::model::{Course, Student};

/// Validate a grading scheme at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scheme(scheme: &SchemeConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Points table
    if scheme.points.is_empty() {
        errors.push("scheme.points: must contain at least one row".to_string());
    }

    let mut seen_glh = HashSet::new();
    for (i, row) in scheme.points.iter().enumerate() {
        if row.glh == 0 {
            errors.push(format!("scheme.points[{}].glh: must be greater than zero", i));
        }
        if !seen_glh.insert(row.glh) {
            errors.push(format!(
                "scheme.points[{}].glh: duplicate row for {} GLH",
                i, row.glh
            ));
        }
        if row.unachieved != 0 {
            errors.push(format!(
                "scheme.points[{}].U: must be 0, got {}",
                i, row.unachieved
            ));
        }
        if !(row.unachieved < row.pass && row.pass < row.merit && row.merit < row.distinction) {
            errors.push(format!(
                "scheme.points[{}]: points must strictly increase U < P < M < D (got {}/{}/{}/{})",
                i, row.unachieved, row.pass, row.merit, row.distinction
            ));
        }
    }

    // Boundary table
    if scheme.boundaries.is_empty() {
        errors.push("scheme.boundaries: must contain at least one row".to_string());
    }

    for (i, boundary) in scheme.boundaries.iter().enumerate() {
        if boundary.grade.trim().is_empty() {
            errors.push(format!("scheme.boundaries[{}].grade: must not be empty", i));
        }
        if i > 0 {
            let previous = &scheme.boundaries[i - 1];
            if boundary.min_points >= previous.min_points {
                errors.push(format!(
                    "scheme.boundaries[{}].min_points: {} must be lower than the row above ({})",
                    i, boundary.min_points, previous.min_points
                ));
            }
            if boundary.ucas_points > previous.ucas_points {
                errors.push(format!(
                    "scheme.boundaries[{}].ucas_points: {} must not exceed the row above ({})",
                    i, boundary.ucas_points, previous.ucas_points
                ));
            }
        }
    }

    if let Some(last) = scheme.boundaries.last() {
        if last.min_points != 0 {
            errors.push(format!(
                "scheme.boundaries[{}].min_points: last row must have threshold 0, got {}",
                scheme.boundaries.len() - 1,
                last.min_points
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Non-fatal problems with a course definition under a scheme.
pub fn check_course(course: &Course, scheme: &SchemeConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    let mut seen = HashSet::new();
    for unit in &course.units {
        if !seen.insert(unit.id.as_str()) {
            warnings.push(format!(
                "course {}: duplicate unit id '{}'; only the first is used",
                course.id, unit.id
            ));
        }
        if !scheme.points.iter().any(|row| row.glh == unit.glh) {
            warnings.push(format!(
                "course {}: unit {} has {} GLH, which has no points row; it will score 0",
                course.id, unit.id, unit.glh
            ));
        }
    }

    let sum = course.unit_glh_sum();
    if sum != course.total_glh {
        warnings.push(format!(
            "course {}: units add up to {} GLH but the course declares {}",
            course.id, sum, course.total_glh
        ));
    }

    warnings
}

/// Non-fatal problems with a student's recorded results.
pub fn check_student(student: &Student, course: &Course) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for result in &student.results {
        if !seen.insert(result.unit_id.as_str()) {
            warnings.push(format!(
                "student {}: more than one result for unit '{}'; all of them are counted",
                student.id, result.unit_id
            ));
        }
        if course.unit(&result.unit_id).is_none() {
            warnings.push(format!(
                "student {}: result for unit '{}' which is not in course {}; ignored",
                student.id, result.unit_id, course.id
            ));
        }
    }

    warnings
}
