use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Achievement level for a single unit, ordered low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// Not yet achieved (also used for "pending")
    #[serde(rename = "U")]
    Unachieved,
    #[serde(rename = "P")]
    Pass,
    #[serde(rename = "M")]
    Merit,
    #[serde(rename = "D")]
    Distinction,
}

impl Grade {
    /// All grades, lowest first.
    pub const ALL: [Grade; 4] = [
        Grade::Unachieved,
        Grade::Pass,
        Grade::Merit,
        Grade::Distinction,
    ];

    /// Parse a grade from its symbol ("U", "P", "M", "D") or full name.
    /// Case-insensitive.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u" | "unachieved" | "pending" => Ok(Grade::Unachieved),
            "p" | "pass" => Ok(Grade::Pass),
            "m" | "merit" => Ok(Grade::Merit),
            "d" | "distinction" => Ok(Grade::Distinction),
            _ => bail!("Unknown grade '{}': expected one of U, P, M, D", s.trim()),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Grade::Unachieved => "U",
            Grade::Pass => "P",
            Grade::Merit => "M",
            Grade::Distinction => "D",
        }
    }

    /// True for any grade above Unachieved.
    pub fn is_achieved(&self) -> bool {
        *self > Grade::Unachieved
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
