use serde::{Deserialize, Serialize};

use crate::model::Grade;

/// Grading scheme: how unit grades turn into points, and how total points
/// turn into a qualification grade.
///
/// Defaults to the RQF BTEC National (2016) points and the Extended Diploma
/// (1080 GLH) boundaries.
///
/// Example YAML:
/// ```yaml
/// scheme:
///   points:
///     - { glh: 60, U: 0, P: 6, M: 10, D: 16 }
///     - { glh: 90, U: 0, P: 9, M: 15, D: 24 }
///   boundaries:
///     - { min_points: 90, grade: PPP, ucas_points: 48 }
///     - { min_points: 0, grade: U, ucas_points: 0 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SchemeConfig {
    /// Points per grade, one row per unit size
    #[serde(default = "default_points")]
    pub points: Vec<UnitPoints>,

    /// Grade boundaries, highest threshold first, ending with a zero row
    #[serde(default = "default_boundaries")]
    pub boundaries: Vec<GradeBoundary>,
}

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            points: default_points(),
            boundaries: default_boundaries(),
        }
    }
}

/// Points awarded for each grade on a unit of a given size.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UnitPoints {
    pub glh: u32,
    #[serde(rename = "U", default)]
    pub unachieved: u32,
    #[serde(rename = "P")]
    pub pass: u32,
    #[serde(rename = "M")]
    pub merit: u32,
    #[serde(rename = "D")]
    pub distinction: u32,
}

impl UnitPoints {
    pub const fn new(glh: u32, unachieved: u32, pass: u32, merit: u32, distinction: u32) -> Self {
        Self {
            glh,
            unachieved,
            pass,
            merit,
            distinction,
        }
    }

    pub fn get(&self, grade: Grade) -> u32 {
        match grade {
            Grade::Unachieved => self.unachieved,
            Grade::Pass => self.pass,
            Grade::Merit => self.merit,
            Grade::Distinction => self.distinction,
        }
    }
}

/// One row of the boundary table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GradeBoundary {
    /// Minimum total points for this grade (inclusive)
    pub min_points: u32,
    /// Qualification grade label, e.g. "DMM"
    pub grade: String,
    pub ucas_points: u32,
}

impl GradeBoundary {
    pub fn new(min_points: u32, grade: &str, ucas_points: u32) -> Self {
        Self {
            min_points,
            grade: grade.to_string(),
            ucas_points,
        }
    }
}

fn default_points() -> Vec<UnitPoints> {
    vec![
        UnitPoints::new(60, 0, 6, 10, 16),
        UnitPoints::new(90, 0, 9, 15, 24),
        UnitPoints::new(120, 0, 12, 20, 32),
    ]
}

fn default_boundaries() -> Vec<GradeBoundary> {
    vec![
        GradeBoundary::new(260, "D*D*D*", 168),
        GradeBoundary::new(250, "D*D*D", 160),
        GradeBoundary::new(230, "D*DD", 152),
        GradeBoundary::new(210, "DDD", 144),
        GradeBoundary::new(190, "DDM", 128),
        GradeBoundary::new(170, "DMM", 112),
        GradeBoundary::new(150, "MMM", 96),
        GradeBoundary::new(130, "MMP", 80),
        GradeBoundary::new(110, "MPP", 64),
        GradeBoundary::new(90, "PPP", 48),
        GradeBoundary::new(0, "U", 0),
    ]
}
