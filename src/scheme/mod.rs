pub mod config;
pub mod engine;
pub mod validation;

pub use config::*;
pub use engine::{
    aggregate, next_grade, points_for, points_for_symbol, resolve_grade, NextGrade, ResultSummary,
    UnitContribution,
};
pub use validation::{check_course, check_student, validate_scheme};
