use serde::Serialize;
use tracing::debug;

use super::config::{GradeBoundary, SchemeConfig, UnitPoints};
use crate::model::{Course, Grade, Student, UnitType};

/// What one recorded result contributed to the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitContribution {
    pub unit_id: String,
    pub number: u32,
    pub name: String,
    pub glh: u32,
    pub unit_type: UnitType,
    pub grade: Grade,
    pub points: u32,
    pub locked: bool,
}

/// The next grade up from the current total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextGrade {
    pub grade: String,
    pub ucas_points: u32,
    pub points_needed: u32,
}

/// Qualification outcome for one student. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub total_points: u32,
    /// GLH of units achieved at Pass or better
    pub current_glh: u32,
    pub grade: String,
    pub ucas_points: u32,
    /// False once any mandatory unit has a recorded Unachieved result
    pub mandatory_passed: bool,
    pub units: Vec<UnitContribution>,
    /// Unit ids referenced by results but missing from the course
    pub orphaned: Vec<String>,
    pub next: Option<NextGrade>,
}

/// Points for a grade on a unit of `glh` hours. Unknown sizes score 0.
pub fn points_for(points: &[UnitPoints], glh: u32, grade: Grade) -> u32 {
    points
        .iter()
        .find(|row| row.glh == glh)
        .map_or(0, |row| row.get(grade))
}

/// Like [`points_for`] but takes a grade symbol. Unknown symbols score 0.
pub fn points_for_symbol(points: &[UnitPoints], glh: u32, symbol: &str) -> u32 {
    Grade::parse(symbol).map_or(0, |grade| points_for(points, glh, grade))
}

/// First boundary (in table order) whose threshold is at or below `total`.
///
/// Returns ("U", 0) if nothing matches, which only happens when the table
/// has no zero row.
pub fn resolve_grade(boundaries: &[GradeBoundary], total: u32) -> (String, u32) {
    for boundary in boundaries {
        if total >= boundary.min_points {
            return (boundary.grade.clone(), boundary.ucas_points);
        }
    }
    ("U".to_string(), 0)
}

/// Closest boundary strictly above `total`, if any.
pub fn next_grade(boundaries: &[GradeBoundary], total: u32) -> Option<NextGrade> {
    boundaries
        .iter()
        .filter(|b| b.min_points > total)
        .min_by_key(|b| b.min_points)
        .map(|b| NextGrade {
            grade: b.grade.clone(),
            ucas_points: b.ucas_points,
            points_needed: b.min_points - total,
        })
}

/// Aggregate a student's recorded results against their course.
///
/// Results for units absent from the course are skipped and listed in
/// `orphaned`. Mandatory units with no recorded result do not affect
/// `mandatory_passed`.
pub fn aggregate(student: &Student, course: &Course, scheme: &SchemeConfig) -> ResultSummary {
    let mut total_points: u32 = 0;
    let mut current_glh: u32 = 0;
    let mut mandatory_passed = true;
    let mut units = Vec::new();
    let mut orphaned = Vec::new();

    for result in &student.results {
        let Some(unit) = course.unit(&result.unit_id) else {
            debug!(
                student = %student.id,
                course = %course.id,
                unit = %result.unit_id,
                "skipping result for unit not in course"
            );
            orphaned.push(result.unit_id.clone());
            continue;
        };

        let points = points_for(&scheme.points, unit.glh, result.grade);
        total_points = total_points.saturating_add(points);

        if result.grade.is_achieved() {
            current_glh = current_glh.saturating_add(unit.glh);
        }

        if unit.is_mandatory() && result.grade == Grade::Unachieved {
            mandatory_passed = false;
        }

        units.push(UnitContribution {
            unit_id: unit.id.clone(),
            number: unit.number,
            name: unit.name.clone(),
            glh: unit.glh,
            unit_type: unit.unit_type,
            grade: result.grade,
            points,
            locked: result.locked,
        });
    }

    let (grade, ucas_points) = resolve_grade(&scheme.boundaries, total_points);
    let next = next_grade(&scheme.boundaries, total_points);

    ResultSummary {
        total_points,
        current_glh,
        grade,
        ucas_points,
        mandatory_passed,
        units,
        orphaned,
        next,
    }
}
