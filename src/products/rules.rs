//! Per-company product rule sets

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::age::AgeDetermination;
use super::health::HealthClassTable;

/// Optional coverage that can be attached to a base term policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiderKind {
    WaiverOfPremium,
    Child,
    AccidentalDeath,
}

impl RiderKind {
    /// Product name of the rider
    pub fn name(&self) -> &'static str {
        match self {
            RiderKind::WaiverOfPremium => "Waiver of Premium",
            RiderKind::Child => "Child Rider",
            RiderKind::AccidentalDeath => "ADB Rider",
        }
    }

    /// Short label used in validation messages
    pub fn label(&self) -> &'static str {
        match self {
            RiderKind::WaiverOfPremium => "WOP Rider",
            RiderKind::Child => "Child Rider",
            RiderKind::AccidentalDeath => "ADB Rider",
        }
    }
}

/// How a rider's maximum issue age is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiderMaxAge {
    /// No maximum declared
    Unbounded,
    /// Fixed maximum issue age
    Fixed(u32),
    /// Highest age present in the rider's rate rows for the term / tobacco use
    SheetDerived,
}

/// Amount a rider premium is charged on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PremiumBasis {
    FaceAmount,
    RiderAmount,
}

/// Underwriting rule for one rider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiderRule {
    pub kind: RiderKind,
    pub available: bool,
    pub max_issue_age: RiderMaxAge,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub premium_basis: PremiumBasis,
}

impl RiderRule {
    /// Available rider with a fixed maximum issue age, priced on the face amount
    pub fn with_max_age(kind: RiderKind, max_issue_age: u32) -> Self {
        Self {
            kind,
            available: true,
            max_issue_age: RiderMaxAge::Fixed(max_issue_age),
            min_amount: None,
            max_amount: None,
            premium_basis: PremiumBasis::FaceAmount,
        }
    }

    /// Available rider whose maximum issue age comes from its rate rows
    pub fn sheet_derived(kind: RiderKind) -> Self {
        Self {
            max_issue_age: RiderMaxAge::SheetDerived,
            ..Self::with_max_age(kind, 0)
        }
    }

    /// Restrict the rider amount and price on it instead of the face amount
    pub fn with_amount_range(mut self, min_amount: Decimal, max_amount: Decimal) -> Self {
        self.min_amount = Some(min_amount);
        self.max_amount = Some(max_amount);
        self.premium_basis = PremiumBasis::RiderAmount;
        self
    }

    /// Declared amount bounds, when both ends are present
    pub fn amount_range(&self) -> Option<(Decimal, Decimal)> {
        self.min_amount.zip(self.max_amount)
    }
}

/// Underwriting rules and pricing constants for one company's term product
///
/// Built once by the catalog and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRuleSet {
    pub company_name: String,
    pub product_name: String,
    pub rating: String,
    pub min_issue_age: u32,

    /// Multiplier converting annual premium to a monthly installment
    pub monthly_modal_factor: Decimal,

    pub age_determination: AgeDetermination,
    pub allowed_terms: Vec<u32>,
    pub min_face_amount: Decimal,
    pub max_face_amount: Decimal,

    /// Two-letter region codes the product cannot be sold in
    pub excluded_regions: Vec<String>,

    pub riders: BTreeMap<RiderKind, RiderRule>,
    pub health_classes: HealthClassTable,

    /// Whether the base product's maximum issue age comes from the sheet definitions
    pub sheet_based_max_age: bool,
}

impl ProductRuleSet {
    pub fn is_term_allowed(&self, term: u32) -> bool {
        self.allowed_terms.contains(&term)
    }

    /// Inclusive on both bounds
    pub fn is_face_amount_allowed(&self, face_amount: Decimal) -> bool {
        face_amount >= self.min_face_amount && face_amount <= self.max_face_amount
    }

    pub fn is_region_allowed(&self, code: &str) -> bool {
        !self
            .excluded_regions
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(code.trim()))
    }

    /// Issue age as of today's local date
    pub fn compute_age(&self, dob: NaiveDate) -> u32 {
        self.compute_age_on(dob, chrono::Local::now().date_naive())
    }

    /// Issue age as of a given date
    pub fn compute_age_on(&self, dob: NaiveDate, today: NaiveDate) -> u32 {
        self.age_determination.age_on(dob, today)
    }

    /// Canonical health class label, or `None` when the pair is not offered
    pub fn normalize_health_class(&self, health_class: &str, tobacco_use: bool) -> Option<&'static str> {
        self.health_classes.normalize(health_class, tobacco_use)
    }

    pub fn rider_rule(&self, kind: RiderKind) -> Option<&RiderRule> {
        self.riders.get(&kind)
    }

    /// Allowed terms formatted for messages, e.g. "10,15,20"
    pub fn allowed_terms_display(&self) -> String {
        self.allowed_terms
            .iter()
            .map(|term| term.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}
