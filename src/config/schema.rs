use serde::{Deserialize, Serialize};

use crate::scheme::SchemeConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Gradebook location (defaults to ~/.config/grade-calc/gradebook.json)
    #[serde(default)]
    pub data_file: Option<String>,

    /// Grading scheme (defaults to BTEC National 2016 tables)
    #[serde(default)]
    pub scheme: Option<SchemeConfig>,
}
