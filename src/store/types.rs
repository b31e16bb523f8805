use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Course, Grade, Sector, Student, UnitDefinition, UnitType};

/// Everything the calculator keeps on disk: courses and enrolled students.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gradebook {
    pub version: u32,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub students: Vec<Student>,
}

impl Default for Gradebook {
    fn default() -> Self {
        Self::new()
    }
}

impl Gradebook {
    /// Create a new empty gradebook with version 1
    pub fn new() -> Self {
        Self {
            version: 1,
            updated_at: None,
            courses: Vec::new(),
            students: Vec::new(),
        }
    }

    /// A gradebook holding the stock Esports Extended Diploma course.
    pub fn seeded() -> Self {
        let mut book = Self::new();
        book.courses.push(esports_extended_diploma());
        book
    }

    pub fn course(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    /// Find a student by id, or by name ignoring case.
    ///
    /// An id match wins. A name shared by several students is refused.
    pub fn student(&self, key: &str) -> Result<&Student> {
        let index = self.student_index(key)?;
        Ok(&self.students[index])
    }

    pub fn student_mut(&mut self, key: &str) -> Result<&mut Student> {
        let index = self.student_index(key)?;
        Ok(&mut self.students[index])
    }

    fn student_index(&self, key: &str) -> Result<usize> {
        if let Some(index) = self.students.iter().position(|s| s.id == key) {
            return Ok(index);
        }

        let matches: Vec<usize> = self
            .students
            .iter()
            .enumerate()
            .filter(|(_, s)| s.name.eq_ignore_ascii_case(key))
            .map(|(i, _)| i)
            .collect();

        match matches.as_slice() {
            [] => bail!("No student matching '{}'", key),
            [index] => Ok(*index),
            _ => {
                let ids: Vec<&str> = matches
                    .iter()
                    .map(|&i| self.students[i].id.as_str())
                    .collect();
                bail!(
                    "'{}' matches several students ({}); use the student id",
                    key,
                    ids.join(", ")
                )
            }
        }
    }

    pub fn students_in<'a>(&'a self, course_id: &'a str) -> impl Iterator<Item = &'a Student> + 'a {
        self.students.iter().filter(move |s| s.course_id == course_id)
    }

    /// Look up a student together with their course.
    pub fn student_with_course(&self, key: &str) -> Result<(&Student, &Course)> {
        let student = self.student(key)?;
        let course = self.course(&student.course_id).with_context(|| {
            format!(
                "Student {} references unknown course '{}'",
                student.id, student.course_id
            )
        })?;
        Ok((student, course))
    }

    /// Enrol a new student on a course and return their id.
    pub fn add_student(&mut self, name: &str, course_id: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Student name must not be empty");
        }
        if self.course(course_id).is_none() {
            bail!("No course with id '{}'", course_id);
        }

        let mut n = self.students.len() + 1;
        let id = loop {
            let candidate = format!("s{}", n);
            if !self.students.iter().any(|s| s.id == candidate) {
                break candidate;
            }
            n += 1;
        };

        self.students
            .push(Student::new(id.clone(), name.to_string(), course_id.to_string()));
        Ok(id)
    }

    /// The student an edit targets, plus the type of the unit being edited.
    /// Fails unless the unit belongs to the student's course.
    fn locate(&mut self, key: &str, unit_id: &str) -> Result<(&mut Student, UnitType)> {
        let index = self.student_index(key)?;
        let student = &self.students[index];
        let course = self.course(&student.course_id).with_context(|| {
            format!(
                "Student {} references unknown course '{}'",
                student.id, student.course_id
            )
        })?;
        let unit_type = course
            .unit(unit_id)
            .with_context(|| format!("Course {} has no unit '{}'", course.id, unit_id))?
            .unit_type;
        Ok((&mut self.students[index], unit_type))
    }

    /// Record a grade for a unit of the student's course.
    pub fn set_grade(&mut self, key: &str, unit_id: &str, grade: Grade) -> Result<()> {
        let (student, _) = self.locate(key, unit_id)?;
        student.set_grade(unit_id, grade)
    }

    /// Flip the sign-off lock on a unit result and return the new state.
    pub fn toggle_lock(&mut self, key: &str, unit_id: &str) -> Result<bool> {
        let (student, _) = self.locate(key, unit_id)?;
        Ok(student.toggle_lock(unit_id))
    }

    /// Start tracking an optional unit. Returns false if it already has a result.
    pub fn add_unit(&mut self, key: &str, unit_id: &str) -> Result<bool> {
        let (student, unit_type) = self.locate(key, unit_id)?;
        if unit_type == UnitType::Mandatory {
            bail!("Unit {} is mandatory; only optional units can be added or removed", unit_id);
        }
        Ok(student.add_unit(unit_id))
    }

    /// Stop tracking an optional unit and return how many results were removed.
    pub fn remove_unit(&mut self, key: &str, unit_id: &str) -> Result<usize> {
        let (student, unit_type) = self.locate(key, unit_id)?;
        if unit_type == UnitType::Mandatory {
            bail!("Unit {} is mandatory; only optional units can be added or removed", unit_id);
        }
        student.remove_unit(unit_id)
    }
}

fn unit(id: &str, number: u32, name: &str, glh: u32, unit_type: UnitType) -> UnitDefinition {
    UnitDefinition {
        id: id.to_string(),
        number,
        name: name.to_string(),
        glh,
        unit_type,
    }
}

fn esports_extended_diploma() -> Course {
    use UnitType::{Mandatory, Optional};

    Course {
        id: "c_esports_1080".to_string(),
        academic_year: "2024-25".to_string(),
        sector: Sector::Esports,
        name: "Esports".to_string(),
        qualification: "Level 3 National Extended Diploma".to_string(),
        total_glh: 1080,
        units: vec![
            unit("u1", 1, "Introduction to Esports", 60, Mandatory),
            unit("u2", 2, "Esports Skills, Strategies and Analysis", 120, Mandatory),
            unit("u3", 3, "Enterprise and Entrepreneurship in the Esports Industry", 90, Mandatory),
            unit("u4", 4, "Health, Wellbeing and Fitness for Esports Players", 90, Mandatory),
            unit("u5", 5, "Esports Events", 120, Mandatory),
            unit("u6", 6, "Live-streamed Broadcasting", 60, Optional),
            unit("u7", 7, "Producing an Esports Brand", 60, Optional),
            unit("u8", 8, "Video Production", 60, Optional),
            unit("u9", 9, "Games Design", 60, Optional),
            unit("u10", 10, "Business Applications of Esports in Social Media", 60, Optional),
            unit("u11", 11, "Shoutcasting", 60, Optional),
            unit("u12", 12, "Esports Coaching", 60, Optional),
            unit("u13", 13, "Psychology for Esports Performance", 60, Optional),
            unit("u14", 14, "Nutrition for Esports Performance", 60, Optional),
            unit("u15", 15, "Ethical and Current Issues in Esports", 60, Optional),
            unit("u19", 19, "Customer Immersion Experiences", 60, Optional),
        ],
    }
}
