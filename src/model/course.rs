use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a unit must be passed for the qualification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitType {
    Mandatory,
    Optional,
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitType::Mandatory => f.write_str("Mandatory"),
            UnitType::Optional => f.write_str("Optional"),
        }
    }
}

/// Subject area a course belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sector {
    Esports,
    Computing,
    #[serde(rename = "IT")]
    It,
    Business,
    #[serde(rename = "Creative Media")]
    CreativeMedia,
    Other,
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sector::Esports => "Esports",
            Sector::Computing => "Computing",
            Sector::It => "IT",
            Sector::Business => "Business",
            Sector::CreativeMedia => "Creative Media",
            Sector::Other => "Other",
        };
        f.write_str(label)
    }
}

/// A unit offered within a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDefinition {
    pub id: String,
    /// Unit number as printed in the specification (display only)
    pub number: u32,
    pub name: String,
    /// Guided learning hours; keys into the points table (usually 60, 90 or 120)
    pub glh: u32,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
}

impl UnitDefinition {
    pub fn is_mandatory(&self) -> bool {
        self.unit_type == UnitType::Mandatory
    }
}

/// A qualification specification and its units.
///
/// `total_glh` is the declared size of the qualification. The sum of the
/// unit GLH is not required to match it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    /// e.g. "2024-25"
    pub academic_year: String,
    pub sector: Sector,
    pub name: String,
    /// e.g. "Level 3 National Extended Diploma"
    pub qualification: String,
    pub total_glh: u32,
    #[serde(default)]
    pub units: Vec<UnitDefinition>,
}

impl Course {
    /// First unit with the given id.
    pub fn unit(&self, unit_id: &str) -> Option<&UnitDefinition> {
        self.units.iter().find(|u| u.id == unit_id)
    }

    pub fn mandatory_units(&self) -> impl Iterator<Item = &UnitDefinition> {
        self.units.iter().filter(|u| u.is_mandatory())
    }

    pub fn optional_units(&self) -> impl Iterator<Item = &UnitDefinition> {
        self.units.iter().filter(|u| !u.is_mandatory())
    }

    /// Sum of the GLH of every unit in the course.
    pub fn unit_glh_sum(&self) -> u32 {
        self.units.iter().map(|u| u.glh).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: &str, glh: u32, unit_type: UnitType) -> UnitDefinition {
        UnitDefinition {
            id: id.to_string(),
            number: 1,
            name: format!("Unit {}", id),
            glh,
            unit_type,
        }
    }

    fn sample_course() -> Course {
        Course {
            id: "c1".to_string(),
            academic_year: "2024-25".to_string(),
            sector: Sector::Computing,
            name: "Computing".to_string(),
            qualification: "Level 3 National Diploma".to_string(),
            total_glh: 720,
            units: vec![
                unit("u1", 120, UnitType::Mandatory),
                unit("u2", 60, UnitType::Optional),
                unit("u3", 90, UnitType::Mandatory),
            ],
        }
    }

    #[test]
    fn test_unit_lookup() {
        let course = sample_course();
        assert_eq!(course.unit("u2").unwrap().glh, 60);
        assert!(course.unit("missing").is_none());
    }

    #[test]
    fn test_mandatory_optional_split() {
        let course = sample_course();
        let mandatory: Vec<_> = course.mandatory_units().map(|u| u.id.as_str()).collect();
        let optional: Vec<_> = course.optional_units().map(|u| u.id.as_str()).collect();
        assert_eq!(mandatory, vec!["u1", "u3"]);
        assert_eq!(optional, vec!["u2"]);
    }

    #[test]
    fn test_unit_glh_sum_is_informational() {
        let course = sample_course();
        assert_eq!(course.unit_glh_sum(), 270);
        assert_ne!(course.unit_glh_sum(), course.total_glh);
    }

    #[test]
    fn test_sector_serde_names() {
        assert_eq!(
            serde_json::to_string(&Sector::CreativeMedia).unwrap(),
            "\"Creative Media\""
        );
        let parsed: Sector = serde_json::from_str("\"IT\"").unwrap();
        assert_eq!(parsed, Sector::It);
    }

    #[test]
    fn test_unit_type_field_name() {
        let json = r#"{"id":"u1","number":1,"name":"Intro","glh":60,"type":"Mandatory"}"#;
        let unit: UnitDefinition = serde_json::from_str(json).unwrap();
        assert!(unit.is_mandatory());
    }
}
