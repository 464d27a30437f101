//! Quote request structures

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Selector value that fans a request out across every registered company
pub const ALL_COMPANIES: &str = "all";

/// Gender of the proposed insured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Label used in the rate tables
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    /// Parse a gender label, ignoring case and surrounding whitespace
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("male") {
            Some(Gender::Male)
        } else if value.eq_ignore_ascii_case("female") {
            Some(Gender::Female)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional rider selections; everything defaults to "not requested"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiderSelection {
    /// Waiver of premium
    #[serde(default)]
    pub waiver_of_premium: bool,

    /// Accidental death benefit
    #[serde(default)]
    pub accidental_death: bool,

    /// Child rider coverage amount (only a positive amount counts as requested)
    #[serde(default)]
    pub child_rider_amount: Option<Decimal>,
}

impl RiderSelection {
    /// Child rider amount when one was actually requested
    pub fn requested_child_amount(&self) -> Option<Decimal> {
        self.child_rider_amount.filter(|amount| *amount > Decimal::ZERO)
    }
}

/// A single quote request as received from the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Company name, or empty / "all" to quote every registered company
    #[serde(default)]
    pub company: Option<String>,

    pub date_of_birth: NaiveDate,

    pub gender: Gender,

    /// Free-text state / region name
    pub state: String,

    /// Term length in years
    pub term: u32,

    pub face_amount: Decimal,

    /// Health class code (e.g. "PP", "P", "RP", "R")
    pub health_class: String,

    pub tobacco_use: bool,

    #[serde(default)]
    pub riders: RiderSelection,
}

impl QuoteRequest {
    /// Whether this request targets every registered company
    pub fn selects_all(&self) -> bool {
        match self.company.as_deref().map(str::trim) {
            None => true,
            Some(name) => name.is_empty() || name.eq_ignore_ascii_case(ALL_COMPANIES),
        }
    }

    /// Copy of this request pinned to one company
    pub fn for_company(&self, company: &str) -> Self {
        Self {
            company: Some(company.to_string()),
            ..self.clone()
        }
    }
}

/// Values derived from a request during validation
///
/// Produced next to the error list instead of rewriting the request. A field
/// is `None` when its translation failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRequest {
    /// Canonical health class label for the company's rate table
    pub health_class: Option<String>,

    /// Two-letter region code
    pub region_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(company: Option<&str>) -> QuoteRequest {
        QuoteRequest {
            company: company.map(str::to_string),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 1).unwrap(),
            gender: Gender::Male,
            state: "Karnataka".to_string(),
            term: 20,
            face_amount: dec!(500000),
            health_class: "P".to_string(),
            tobacco_use: false,
            riders: RiderSelection::default(),
        }
    }

    #[test]
    fn test_company_selector() {
        assert!(request(None).selects_all());
        assert!(request(Some("")).selects_all());
        assert!(request(Some("  ALL ")).selects_all());
        assert!(!request(Some("hdfc")).selects_all());
    }

    #[test]
    fn test_child_amount_must_be_positive() {
        let mut riders = RiderSelection::default();
        assert_eq!(riders.requested_child_amount(), None);

        riders.child_rider_amount = Some(Decimal::ZERO);
        assert_eq!(riders.requested_child_amount(), None);

        riders.child_rider_amount = Some(dec!(5000));
        assert_eq!(riders.requested_child_amount(), Some(dec!(5000)));
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::parse(" MALE "), Some(Gender::Male));
        assert_eq!(Gender::parse("female"), Some(Gender::Female));
        assert_eq!(Gender::parse("other"), None);
    }

    #[test]
    fn test_for_company_keeps_fields() {
        let original = request(None);
        let pinned = original.for_company("ICICI");
        assert_eq!(pinned.company.as_deref(), Some("ICICI"));
        assert_eq!(pinned.face_amount, original.face_amount);
        assert!(original.company.is_none());
    }
}
