pub mod course;
pub mod grade;
pub mod student;

pub use course::{Course, Sector, UnitDefinition, UnitType};
pub use grade::Grade;
pub use student::{Student, StudentUnitResult};
