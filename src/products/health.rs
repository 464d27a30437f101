//! Health class normalization
//!
//! Maps a declared health class code plus tobacco use onto the canonical
//! label used in a company's base rate table.

use serde::{Deserialize, Serialize};

pub const PREFERRED_PLUS_NON_TOB: &str = "Preferred Plus Non-Tob";
pub const PREFERRED_NON_TOB: &str = "Preferred Non-Tob";
pub const STANDARD_PLUS_NON_TOB: &str = "Standard Plus Non-Tob";
pub const STANDARD_NON_TOB: &str = "Standard Non-Tob";
pub const PREFERRED_TOB: &str = "Preferred Tob";
pub const STANDARD_TOB: &str = "Standard Tob";

/// (code, tobacco use, canonical label)
type ClassEntry = (&'static str, bool, &'static str);

const FULL_TABLE: &[ClassEntry] = &[
    ("PP", false, PREFERRED_PLUS_NON_TOB),
    ("P", false, PREFERRED_NON_TOB),
    ("RP", false, STANDARD_PLUS_NON_TOB),
    ("R", false, STANDARD_NON_TOB),
    ("PP", true, PREFERRED_TOB),
    ("P", true, PREFERRED_TOB),
    ("RP", true, STANDARD_TOB),
    ("R", true, STANDARD_TOB),
];

// No tobacco-adjusted preferred tier
const REDUCED_TABLE: &[ClassEntry] = &[
    ("PP", false, PREFERRED_PLUS_NON_TOB),
    ("P", false, PREFERRED_NON_TOB),
    ("RP", false, STANDARD_PLUS_NON_TOB),
    ("R", false, STANDARD_NON_TOB),
    ("RP", true, STANDARD_TOB),
    ("R", true, STANDARD_TOB),
];

/// Health class table a product exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthClassTable {
    /// All four tiers, with preferred and standard tobacco classes
    Full,
    /// No tobacco-adjusted preferred class
    NoPreferredTobacco,
}

impl HealthClassTable {
    fn entries(&self) -> &'static [ClassEntry] {
        match self {
            HealthClassTable::Full => FULL_TABLE,
            HealthClassTable::NoPreferredTobacco => REDUCED_TABLE,
        }
    }

    /// Normalize a code (or an already canonical label) for the given tobacco use
    ///
    /// Returns `None` for pairs the table does not map; there is no fallback class.
    pub fn normalize(&self, health_class: &str, tobacco_use: bool) -> Option<&'static str> {
        let health_class = health_class.trim();
        self.entries()
            .iter()
            .filter(|(_, tobacco, _)| *tobacco == tobacco_use)
            .find(|(code, _, label)| {
                code.eq_ignore_ascii_case(health_class) || label.eq_ignore_ascii_case(health_class)
            })
            .map(|(_, _, label)| *label)
    }
}
