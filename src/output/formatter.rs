use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::model::{Course, Grade, Student, UnitType};
use crate::scheme::ResultSummary;

/// A student with their computed summary, for class tables
pub struct ClassRow<'a> {
    pub student: &'a Student,
    pub summary: ResultSummary,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Grade label as shown in unit tables ("U / Pending" for Unachieved)
pub fn format_grade_label(grade: Grade) -> String {
    match grade {
        Grade::Unachieved => "U / Pending".to_string(),
        other => other.symbol().to_string(),
    }
}

/// "Pass" when every recorded mandatory result is achieved, otherwise "Incomplete"
pub fn format_mandatory_status(passed: bool) -> &'static str {
    if passed {
        "Pass"
    } else {
        "Incomplete"
    }
}

fn colored_grade(grade: Grade, use_colors: bool) -> String {
    let label = format!("{:<11}", format_grade_label(grade));
    if !use_colors {
        return label;
    }
    match grade {
        Grade::Unachieved => label.dimmed().to_string(),
        Grade::Pass => label.yellow().to_string(),
        Grade::Merit => label.blue().to_string(),
        Grade::Distinction => label.green().to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
pub fn terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format a full result summary for one student.
///
/// Mandatory units are listed first, then optional ones, each in the order
/// the results were recorded.
pub fn format_summary(
    course: &Course,
    student: &Student,
    summary: &ResultSummary,
    term_width: Option<usize>,
    use_colors: bool,
) -> String {
    let mut lines = Vec::new();

    let title = format!("{} ({})", student.name, student.id);
    let subtitle = format!(
        "{} {} - {} [{}]",
        course.qualification, course.name, course.academic_year, course.sector
    );
    if use_colors {
        lines.push(title.bold().to_string());
        lines.push(subtitle.dimmed().to_string());
    } else {
        lines.push(title);
        lines.push(subtitle);
    }
    lines.push(String::new());

    for (heading, unit_type) in [
        ("Mandatory units", UnitType::Mandatory),
        ("Optional units", UnitType::Optional),
    ] {
        let rows: Vec<_> = summary
            .units
            .iter()
            .filter(|u| u.unit_type == unit_type)
            .collect();
        if rows.is_empty() {
            continue;
        }

        if use_colors {
            lines.push(heading.bold().to_string());
        } else {
            lines.push(heading.to_string());
        }

        // number(4) + glh(5) + grade(11) + points(4) + lock(1) + separators
        let fixed_width = 4 + 5 + 11 + 4 + 1 + 2 * 5;

        for unit in rows {
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate(&unit.name, width - fixed_width),
                Some(_) => truncate(&unit.name, 20),
                None => unit.name.clone(),
            };
            let lock = if unit.locked { "L" } else { " " };
            lines.push(format!(
                "{:>4}  {:>5}  {}  {:>4}  {}  {}",
                unit.number,
                format!("{}h", unit.glh),
                colored_grade(unit.grade, use_colors),
                unit.points,
                lock,
                name
            ));
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "GLH taken:         {} / {}",
        summary.current_glh, course.total_glh
    ));

    let status = format_mandatory_status(summary.mandatory_passed);
    let status = if !use_colors {
        status.to_string()
    } else if summary.mandatory_passed {
        status.green().to_string()
    } else {
        status.red().to_string()
    };
    lines.push(format!("Mandatory status:  {}", status));
    lines.push(format!("Total points:      {}", summary.total_points));

    let grade = if use_colors {
        summary.grade.bold().to_string()
    } else {
        summary.grade.clone()
    };
    lines.push(format!("Overall grade:     {}", grade));
    lines.push(format!("UCAS points:       {}", summary.ucas_points));

    match &summary.next {
        Some(next) => lines.push(format!(
            "Next grade:        {} ({} UCAS) in {} more points",
            next.grade, next.ucas_points, next.points_needed
        )),
        None => lines.push("Next grade:        top grade reached".to_string()),
    }

    if !summary.orphaned.is_empty() {
        lines.push(String::new());
        let note = format!(
            "Ignored results for units not in this course: {}",
            summary.orphaned.join(", ")
        );
        if use_colors {
            lines.push(note.yellow().to_string());
        } else {
            lines.push(note);
        }
    }

    lines.join("\n")
}

/// Format a class overview: Index, Grade, Points, UCAS, Mandatory status, Name
pub fn format_class_table(rows: &[ClassRow], term_width: Option<usize>, use_colors: bool) -> String {
    if rows.is_empty() {
        return "No students found.".to_string();
    }

    // index(3) + grade(6) + points(4) + ucas(4) + status(10) + separators
    let fixed_width = 3 + 1 + 6 + 4 + 4 + 10 + 2 * 5;

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let index_str = format!("{:>2}.", idx + 1);
            let grade = format!("{:>6}", row.summary.grade);
            let status = format!("{:<10}", format_mandatory_status(row.summary.mandatory_passed));

            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate(&row.student.name, width - fixed_width)
                }
                Some(_) => truncate(&row.student.name, 20),
                None => row.student.name.clone(),
            };

            if use_colors {
                let status = if row.summary.mandatory_passed {
                    status.green().to_string()
                } else {
                    status.red().to_string()
                };
                format!(
                    "{} {}  {:>4}  {:>4}  {}  {}",
                    index_str.dimmed(),
                    grade.bold(),
                    row.summary.total_points,
                    row.summary.ucas_points,
                    status,
                    name
                )
            } else {
                format!(
                    "{} {}  {:>4}  {:>4}  {}  {}",
                    index_str,
                    grade,
                    row.summary.total_points,
                    row.summary.ucas_points,
                    status,
                    name
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a class overview as tab-separated values for scripting
/// Columns: id, name, points, glh, grade, ucas, mandatory (no headers, no colors)
pub fn format_tsv(rows: &[ClassRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                row.student.id,
                row.student.name,
                row.summary.total_points,
                row.summary.current_glh,
                row.summary.grade,
                row.summary.ucas_points,
                format_mandatory_status(row.summary.mandatory_passed)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per course: id, qualification, name, year, GLH and unit counts
pub fn format_course_list(courses: &[Course], use_colors: bool) -> String {
    if courses.is_empty() {
        return "No courses found.".to_string();
    }

    courses
        .iter()
        .map(|course| {
            let detail = format!(
                "{} {} ({}, {} GLH, {} units, {} mandatory)",
                course.qualification,
                course.name,
                course.academic_year,
                course.total_glh,
                course.units.len(),
                course.mandatory_units().count()
            );
            if use_colors {
                format!("{}  {}", course.id.cyan(), detail)
            } else {
                format!("{}  {}", course.id, detail)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Sector, StudentUnitResult, UnitDefinition};
    use crate::scheme::{aggregate, SchemeConfig};

    fn sample_course() -> Course {
        Course {
            id: "c1".to_string(),
            academic_year: "2024-25".to_string(),
            sector: Sector::Esports,
            name: "Esports".to_string(),
            qualification: "Level 3 National Extended Diploma".to_string(),
            total_glh: 1080,
            units: vec![
                UnitDefinition {
                    id: "u1".to_string(),
                    number: 1,
                    name: "Introduction to Esports".to_string(),
                    glh: 60,
                    unit_type: UnitType::Mandatory,
                },
                UnitDefinition {
                    id: "u6".to_string(),
                    number: 6,
                    name: "Live-streamed Broadcasting".to_string(),
                    glh: 90,
                    unit_type: UnitType::Optional,
                },
            ],
        }
    }

    fn sample_student(name: &str, grades: &[(&str, Grade)]) -> Student {
        Student {
            id: "s1".to_string(),
            name: name.to_string(),
            course_id: "c1".to_string(),
            results: grades
                .iter()
                .map(|(unit_id, grade)| StudentUnitResult {
                    unit_id: unit_id.to_string(),
                    grade: *grade,
                    locked: *unit_id == "u1",
                })
                .collect(),
        }
    }

    #[test]
    fn test_format_grade_label() {
        assert_eq!(format_grade_label(Grade::Unachieved), "U / Pending");
        assert_eq!(format_grade_label(Grade::Merit), "M");
    }

    #[test]
    fn test_format_mandatory_status() {
        assert_eq!(format_mandatory_status(true), "Pass");
        assert_eq!(format_mandatory_status(false), "Incomplete");
    }

    #[test]
    fn test_format_summary_plain() {
        let course = sample_course();
        let student = sample_student("Avery Lee", &[("u1", Grade::Distinction), ("u6", Grade::Pass)]);
        let summary = aggregate(&student, &course, &SchemeConfig::default());
        let output = format_summary(&course, &student, &summary, None, false);

        assert!(output.contains("Avery Lee (s1)"));
        assert!(output.contains("Mandatory units"));
        assert!(output.contains("Optional units"));
        assert!(output.contains("Introduction to Esports"));
        assert!(output.contains("GLH taken:         150 / 1080"));
        assert!(output.contains("Mandatory status:  Pass"));
        assert!(output.contains("Total points:      25"));
        assert!(output.contains("Overall grade:     U"));
        assert!(output.contains("PPP (48 UCAS) in 65 more points"));
        assert!(!output.contains("Ignored results"));
    }

    #[test]
    fn test_format_summary_narrow_terminal_truncates_names() {
        let course = sample_course();
        let student = sample_student("Avery Lee", &[("u1", Grade::Distinction)]);
        let summary = aggregate(&student, &course, &SchemeConfig::default());

        let narrow = format_summary(&course, &student, &summary, Some(40), false);
        assert!(narrow.contains("Introduction to E..."));
        assert!(!narrow.contains("Introduction to Esports"));

        let wide = format_summary(&course, &student, &summary, Some(200), false);
        assert!(wide.contains("Introduction to Esports"));
    }

    #[test]
    fn test_format_summary_lists_orphaned() {
        let course = sample_course();
        let student = sample_student("Avery Lee", &[("u1", Grade::Unachieved), ("u42", Grade::Pass)]);
        let summary = aggregate(&student, &course, &SchemeConfig::default());
        let output = format_summary(&course, &student, &summary, None, false);

        assert!(output.contains("U / Pending"));
        assert!(output.contains("Mandatory status:  Incomplete"));
        assert!(output.contains("Ignored results for units not in this course: u42"));
        assert!(!output.contains("Optional units"));
    }

    #[test]
    fn test_format_class_table_empty() {
        assert_eq!(format_class_table(&[], None, false), "No students found.");
    }

    #[test]
    fn test_format_class_table_and_tsv() {
        let course = sample_course();
        let student = sample_student("Sam Carter", &[("u1", Grade::Merit), ("u6", Grade::Merit)]);
        let summary = aggregate(&student, &course, &SchemeConfig::default());
        let rows = vec![ClassRow {
            student: &student,
            summary,
        }];

        let table = format_class_table(&rows, None, false);
        assert!(table.starts_with(" 1."));
        assert!(table.contains("Sam Carter"));
        assert!(table.contains("25"));
        assert!(table.contains("Pass"));

        let tsv = format_tsv(&rows);
        assert_eq!(tsv, "s1\tSam Carter\t25\t150\tU\t0\tPass");
    }

    #[test]
    fn test_format_course_list() {
        let courses = vec![sample_course()];
        let output = format_course_list(&courses, false);
        assert!(output.starts_with("c1  Level 3 National Extended Diploma Esports"));
        assert!(output.contains("1080 GLH, 2 units, 1 mandatory"));
        assert_eq!(format_course_list(&[], false), "No courses found.");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Short", 10), "Short");
        assert_eq!(truncate("A much longer unit name", 10), "A much ...");
        assert_eq!(truncate("Hello", 2), "He");
    }
}
