use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::grade::Grade;

/// One student's outcome for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentUnitResult {
    pub unit_id: String,
    pub grade: Grade,
    /// Signed off by the instructor; normal edits are refused while set
    #[serde(default)]
    pub locked: bool,
}

/// A student enrolled on a course, with their recorded unit results.
///
/// At most one result per unit id is expected but not enforced here.
/// Lookups use the first matching entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub course_id: String,
    #[serde(default)]
    pub results: Vec<StudentUnitResult>,
}

impl Student {
    pub fn new(id: String, name: String, course_id: String) -> Self {
        Self {
            id,
            name,
            course_id,
            results: Vec::new(),
        }
    }

    /// First recorded result for a unit.
    pub fn result_for(&self, unit_id: &str) -> Option<&StudentUnitResult> {
        self.results.iter().find(|r| r.unit_id == unit_id)
    }

    /// Record a grade for a unit.
    ///
    /// Updates the first existing result for the unit, or appends a new
    /// unlocked one. Fails if that result is locked.
    pub fn set_grade(&mut self, unit_id: &str, grade: Grade) -> Result<()> {
        match self.results.iter_mut().find(|r| r.unit_id == unit_id) {
            Some(existing) if existing.locked => {
                bail!("Result for unit {} is locked; unlock it before editing", unit_id)
            }
            Some(existing) => existing.grade = grade,
            None => self.results.push(StudentUnitResult {
                unit_id: unit_id.to_string(),
                grade,
                locked: false,
            }),
        }
        Ok(())
    }

    /// Flip the sign-off lock for a unit and return the new state.
    ///
    /// A unit with no result yet is recorded as Unachieved and locked.
    pub fn toggle_lock(&mut self, unit_id: &str) -> bool {
        match self.results.iter_mut().find(|r| r.unit_id == unit_id) {
            Some(existing) => {
                existing.locked = !existing.locked;
                existing.locked
            }
            None => {
                self.results.push(StudentUnitResult {
                    unit_id: unit_id.to_string(),
                    grade: Grade::Unachieved,
                    locked: true,
                });
                true
            }
        }
    }

    /// Start tracking a unit at Unachieved. Returns false if it already has a result.
    pub fn add_unit(&mut self, unit_id: &str) -> bool {
        if self.result_for(unit_id).is_some() {
            return false;
        }
        self.results.push(StudentUnitResult {
            unit_id: unit_id.to_string(),
            grade: Grade::Unachieved,
            locked: false,
        });
        true
    }

    /// Remove every result for a unit and return how many were removed.
    ///
    /// Refuses when any of them is locked.
    pub fn remove_unit(&mut self, unit_id: &str) -> Result<usize> {
        if self
            .results
            .iter()
            .any(|r| r.unit_id == unit_id && r.locked)
        {
            bail!("Result for unit {} is locked; unlock it before removing", unit_id);
        }
        let before = self.results.len();
        self.results.retain(|r| r.unit_id != unit_id);
        Ok(before - self.results.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_student() -> Student {
        Student::new("s1".to_string(), "Avery Lee".to_string(), "c1".to_string())
    }

    #[test]
    fn test_set_grade_appends_then_updates() {
        let mut student = sample_student();
        student.set_grade("u1", Grade::Pass).unwrap();
        assert_eq!(student.results.len(), 1);
        assert_eq!(student.result_for("u1").unwrap().grade, Grade::Pass);

        student.set_grade("u1", Grade::Merit).unwrap();
        assert_eq!(student.results.len(), 1);
        assert_eq!(student.result_for("u1").unwrap().grade, Grade::Merit);
        assert!(!student.result_for("u1").unwrap().locked);
    }

    #[test]
    fn test_set_grade_refused_when_locked() {
        let mut student = sample_student();
        student.set_grade("u1", Grade::Distinction).unwrap();
        assert!(student.toggle_lock("u1"));

        let err = student.set_grade("u1", Grade::Pass).unwrap_err();
        assert!(err.to_string().contains("locked"));
        assert_eq!(student.result_for("u1").unwrap().grade, Grade::Distinction);
    }

    #[test]
    fn test_toggle_lock_flips() {
        let mut student = sample_student();
        student.set_grade("u1", Grade::Pass).unwrap();
        assert!(student.toggle_lock("u1"));
        assert!(!student.toggle_lock("u1"));
        student.set_grade("u1", Grade::Merit).unwrap();
    }

    #[test]
    fn test_toggle_lock_on_unrecorded_unit() {
        let mut student = sample_student();
        assert!(student.toggle_lock("u7"));
        let result = student.result_for("u7").unwrap();
        assert_eq!(result.grade, Grade::Unachieved);
        assert!(result.locked);
    }

    #[test]
    fn test_add_unit_is_noop_when_present() {
        let mut student = sample_student();
        assert!(student.add_unit("u6"));
        assert!(!student.add_unit("u6"));
        assert_eq!(student.results.len(), 1);
        assert_eq!(student.results[0].grade, Grade::Unachieved);
    }

    #[test]
    fn test_remove_unit_removes_duplicates() {
        let mut student = sample_student();
        student.results.push(StudentUnitResult {
            unit_id: "u6".to_string(),
            grade: Grade::Pass,
            locked: false,
        });
        student.results.push(StudentUnitResult {
            unit_id: "u6".to_string(),
            grade: Grade::Merit,
            locked: false,
        });
        student.add_unit("u7");

        assert_eq!(student.remove_unit("u6").unwrap(), 2);
        assert_eq!(student.results.len(), 1);
        assert_eq!(student.remove_unit("u6").unwrap(), 0);
    }

    #[test]
    fn test_remove_unit_refused_when_locked() {
        let mut student = sample_student();
        student.toggle_lock("u6");
        assert!(student.remove_unit("u6").is_err());
        assert_eq!(student.results.len(), 1);
    }

    #[test]
    fn test_locked_defaults_to_false() {
        let json = r#"{"unit_id":"u1","grade":"P"}"#;
        let result: StudentUnitResult = serde_json::from_str(json).unwrap();
        assert!(!result.locked);
    }
}
