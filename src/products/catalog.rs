//! Registered companies and their product rule sets

use std::collections::BTreeMap;

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::age::AgeDetermination;
use super::health::HealthClassTable;
use super::rules::{ProductRuleSet, RiderKind, RiderRule};
use crate::error::QuoteError;

/// Companies with a registered term product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Company {
    Hdfc,
    Icici,
    Kotak,
    Sbi,
}

impl Company {
    /// Registration order; fan-out results follow this order
    pub const ALL: [Company; 4] = [Company::Hdfc, Company::Icici, Company::Kotak, Company::Sbi];

    pub fn name(&self) -> &'static str {
        match self {
            Company::Hdfc => "HDFC",
            Company::Icici => "ICICI",
            Company::Kotak => "KOTAK",
            Company::Sbi => "SBI",
        }
    }

    /// Build the company's product rule set
    pub fn rule_set(&self) -> ProductRuleSet {
        match self {
            Company::Hdfc => ProductRuleSet {
                company_name: self.name().to_string(),
                product_name: "HDFC Term".to_string(),
                rating: "A".to_string(),
                min_issue_age: 20,
                monthly_modal_factor: dec!(0.0845),
                age_determination: AgeDetermination::NearestBirthday,
                allowed_terms: vec![10, 15, 20, 25, 30, 35],
                min_face_amount: dec!(100000),
                max_face_amount: dec!(100000000),
                excluded_regions: codes(&["BH", "UP"]),
                riders: riders(vec![
                    RiderRule::with_max_age(RiderKind::WaiverOfPremium, 65),
                    RiderRule::with_max_age(RiderKind::Child, 55)
                        .with_amount_range(dec!(1000), dec!(25000)),
                    RiderRule::with_max_age(RiderKind::AccidentalDeath, 55),
                ]),
                health_classes: HealthClassTable::Full,
                sheet_based_max_age: true,
            },
            Company::Icici => ProductRuleSet {
                company_name: self.name().to_string(),
                product_name: "ICICI Term".to_string(),
                rating: "A+".to_string(),
                min_issue_age: 20,
                monthly_modal_factor: dec!(0.085),
                age_determination: AgeDetermination::NearestBirthday,
                allowed_terms: vec![10, 15, 20, 25, 30, 40],
                min_face_amount: dec!(100000),
                max_face_amount: dec!(10000000),
                excluded_regions: codes(&["BH", "UP"]),
                riders: riders(vec![
                    RiderRule::sheet_derived(RiderKind::WaiverOfPremium),
                    RiderRule::with_max_age(RiderKind::Child, 55)
                        .with_amount_range(dec!(5000), dec!(10000)),
                ]),
                health_classes: HealthClassTable::Full,
                sheet_based_max_age: true,
            },
            Company::Kotak => ProductRuleSet {
                company_name: self.name().to_string(),
                product_name: "KOTAK Term".to_string(),
                rating: "A+".to_string(),
                min_issue_age: 18,
                monthly_modal_factor: dec!(0.0875),
                age_determination: AgeDetermination::Exact,
                allowed_terms: vec![10, 15, 20, 25, 30, 35, 40],
                min_face_amount: dec!(100000),
                max_face_amount: dec!(10000000),
                excluded_regions: codes(&["MH", "MP", "UP"]),
                riders: BTreeMap::new(),
                health_classes: HealthClassTable::NoPreferredTobacco,
                sheet_based_max_age: true,
            },
            Company::Sbi => ProductRuleSet {
                company_name: self.name().to_string(),
                product_name: "SBI Term".to_string(),
                rating: "A".to_string(),
                min_issue_age: 18,
                monthly_modal_factor: dec!(0.0875),
                age_determination: AgeDetermination::Exact,
                allowed_terms: vec![10, 15, 20, 30],
                min_face_amount: dec!(100000),
                max_face_amount: dec!(9999999),
                excluded_regions: codes(&["MH", "MP", "UP"]),
                riders: BTreeMap::new(),
                health_classes: HealthClassTable::Full,
                sheet_based_max_age: true,
            },
        }
    }
}

fn codes(values: &[&str]) -> Vec<String> {
    values.iter().map(|code| code.to_string()).collect()
}

fn riders(rules: Vec<RiderRule>) -> BTreeMap<RiderKind, RiderRule> {
    rules.into_iter().map(|rule| (rule.kind, rule)).collect()
}

/// Ordered registry of product rule sets
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    products: Vec<ProductRuleSet>,
}

impl ProductCatalog {
    /// Catalog of every registered company, in registration order
    pub fn standard() -> Self {
        Self::new(Company::ALL.iter().map(Company::rule_set).collect())
    }

    /// Catalog over an explicit list of rule sets
    pub fn new(products: Vec<ProductRuleSet>) -> Self {
        Self { products }
    }

    /// Case-insensitive exact match on company name
    pub fn resolve(&self, company_name: &str) -> Result<&ProductRuleSet, QuoteError> {
        let wanted = company_name.trim();
        self.products
            .iter()
            .find(|product| product.company_name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| QuoteError::CompanyNotFound(wanted.to_string()))
    }

    /// All rule sets in registration order
    pub fn list_all(&self) -> &[ProductRuleSet] {
        &self.products
    }

    pub fn company_names(&self) -> impl Iterator<Item = &str> {
        self.products.iter().map(|product| product.company_name.as_str())
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::RiderMaxAge;

    #[test]
    fn test_resolve_is_case_insensitive() {
        let catalog = ProductCatalog::standard();
        assert_eq!(catalog.resolve("hdfc").unwrap().product_name, "HDFC Term");
        assert_eq!(catalog.resolve(" Icici ").unwrap().company_name, "ICICI");
    }

    #[test]
    fn test_resolve_unknown_company() {
        let catalog = ProductCatalog::standard();
        match catalog.resolve("LIC") {
            Err(QuoteError::CompanyNotFound(name)) => assert_eq!(name, "LIC"),
            other => panic!("expected CompanyNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_registration_order_is_stable() {
        let catalog = ProductCatalog::standard();
        let first: Vec<_> = catalog.company_names().map(str::to_string).collect();
        let second: Vec<_> = catalog.company_names().map(str::to_string).collect();
        assert_eq!(first, vec!["HDFC", "ICICI", "KOTAK", "SBI"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_kotak_rules() {
        let kotak = Company::Kotak.rule_set();
        assert_eq!(kotak.min_issue_age, 18);
        assert_eq!(kotak.age_determination, AgeDetermination::Exact);
        assert_eq!(kotak.allowed_terms, vec![10, 15, 20, 25, 30, 35, 40]);
        assert!(kotak.riders.is_empty());
        assert_eq!(kotak.normalize_health_class("P", true), None);
    }

    #[test]
    fn test_rider_rules_per_company() {
        let icici = Company::Icici.rule_set();
        let waiver = icici.rider_rule(RiderKind::WaiverOfPremium).unwrap();
        assert_eq!(waiver.max_issue_age, RiderMaxAge::SheetDerived);
        assert!(icici.rider_rule(RiderKind::AccidentalDeath).is_none());

        let hdfc = Company::Hdfc.rule_set();
        let adb = hdfc.rider_rule(RiderKind::AccidentalDeath).unwrap();
        assert_eq!(adb.max_issue_age, RiderMaxAge::Fixed(55));
        let child = hdfc.rider_rule(RiderKind::Child).unwrap();
        assert_eq!(child.amount_range(), Some((dec!(1000), dec!(25000))));
    }
}
