//! Input validation against a product's underwriting rules
//!
//! Checks run in a fixed order and every failure is collected:
//! 1. minimum issue age
//! 2. term
//! 3. health class (and the sheet-derived maximum issue age)
//! 4. region
//! 5. face amount
//! 6. child rider
//! 7. waiver of premium rider
//! 8. accidental death rider
//!
//! Secondary checks that need a translated value (normalized health class,
//! region code) only run when the translation succeeded.

use log::debug;
use rust_decimal::Decimal;

use crate::error::QuoteError;
use crate::products::{region_code, region_name, ProductRuleSet, RiderKind, RiderMaxAge, RiderRule};
use crate::rates::{RateTableStore, RiderKey};
use crate::request::{NormalizedRequest, QuoteRequest};

/// Result of validating one request against one product
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub normalized: NormalizedRequest,
    pub errors: Vec<String>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Normalized values, or the full error list
    pub fn into_result(self) -> Result<NormalizedRequest, QuoteError> {
        if self.errors.is_empty() {
            Ok(self.normalized)
        } else {
            Err(QuoteError::ValidationFailed(self.errors))
        }
    }
}

/// Stateless validator over a rate table store
pub struct Validator<'a> {
    store: &'a RateTableStore,
}

impl<'a> Validator<'a> {
    pub fn new(store: &'a RateTableStore) -> Self {
        Self { store }
    }

    /// Validate a request for a product at the given issue age
    pub fn validate(&self, request: &QuoteRequest, rules: &ProductRuleSet, age: u32) -> Validation {
        let mut validation = Validation::default();
        let errors = &mut validation.errors;
        let company = rules.company_name.as_str();

        // 1. minimum issue age
        if age < rules.min_issue_age {
            errors.push(format!(
                "Minimum age for {} is {}, but given age is {}",
                company, rules.min_issue_age, age
            ));
        }

        // 2. term
        if !rules.is_term_allowed(request.term) {
            errors.push(format!(
                "Term '{}' is invalid for {}. Allowed: {}",
                request.term,
                company,
                rules.allowed_terms_display()
            ));
        }

        // 3. health class
        match rules.normalize_health_class(&request.health_class, request.tobacco_use) {
            None => {
                let tobacco_text = if request.tobacco_use {
                    "with Tobacco Use"
                } else {
                    "with No Tobacco Use"
                };
                errors.push(format!(
                    "The combination of HealthClass '{}' {} is not allowed for {}.",
                    request.health_class, tobacco_text, company
                ));
            }
            Some(normalized) => {
                if rules.sheet_based_max_age {
                    let max_age = self.store.max_age_from_sheet_definition(
                        company,
                        request.term,
                        normalized,
                        request.gender,
                    );
                    if let Some(max_age) = max_age.filter(|max_age| age > *max_age) {
                        errors.push(format!(
                            "Maximum issue age for term {}, health class '{}', and gender '{}' is {}, but provided age is {}.",
                            request.term, request.health_class, request.gender, max_age, age
                        ));
                    }
                }
                validation.normalized.health_class = Some(normalized.to_string());
            }
        }

        // 4. region
        let state_name = request.state.trim();
        match region_code(state_name) {
            None => errors.push(format!("Invalid state name '{}'", state_name)),
            Some(code) => {
                if !rules.is_region_allowed(code) {
                    let excluded = rules
                        .excluded_regions
                        .iter()
                        .filter_map(|code| region_name(code))
                        .collect::<Vec<_>>()
                        .join(", ");
                    errors.push(format!(
                        "State '{}' is not allowed for {}. NotAllowed: {}",
                        state_name, company, excluded
                    ));
                }
                validation.normalized.region_code = Some(code.to_string());
            }
        }

        // 5. face amount
        if !rules.is_face_amount_allowed(request.face_amount) {
            errors.push(format!(
                "Face amount must be between {} and {}",
                rules.min_face_amount, rules.max_face_amount
            ));
        }

        let key = RiderKey {
            age,
            term: request.term,
            tobacco_use: request.tobacco_use,
        };

        // 6. child rider
        if let Some(amount) = request.riders.requested_child_amount() {
            self.check_rider(rules, RiderKind::Child, Some(amount), &key, errors);
        }

        // 7. waiver of premium
        if request.riders.waiver_of_premium {
            self.check_rider(rules, RiderKind::WaiverOfPremium, None, &key, errors);
        }

        // 8. accidental death
        if request.riders.accidental_death {
            self.check_rider(rules, RiderKind::AccidentalDeath, None, &key, errors);
        }

        debug!(
            "{}: validation finished with {} error(s)",
            company,
            validation.errors.len()
        );
        validation
    }

    /// Availability, amount range, maximum issue age and rate existence for
    /// one rider; every failing check is reported
    fn check_rider(
        &self,
        rules: &ProductRuleSet,
        kind: RiderKind,
        amount: Option<Decimal>,
        key: &RiderKey,
        errors: &mut Vec<String>,
    ) {
        let company = rules.company_name.as_str();
        let Some(rule) = available_rider(rules, kind) else {
            errors.push(unsupported(company, kind));
            return;
        };

        if let (Some(amount), Some((min, max))) = (amount, rule.amount_range()) {
            if amount < min || amount > max {
                errors.push(format!(
                    "ChildRiderAmount must be between {} and {} for {}.",
                    min, max, company
                ));
            }
        }

        let max_age = match rule.max_issue_age {
            RiderMaxAge::Unbounded => None,
            RiderMaxAge::Fixed(max_age) => Some(max_age),
            RiderMaxAge::SheetDerived => self.sheet_max_age(company, kind, key),
        };
        if let Some(max_age) = max_age.filter(|max_age| key.age > *max_age) {
            errors.push(over_age(company, kind, max_age, key.age));
        }

        if self.store.find_rider_rate(company, kind, key).is_none() {
            errors.push(missing_rate(company, kind, key));
        }
    }

    fn sheet_max_age(&self, company: &str, kind: RiderKind, key: &RiderKey) -> Option<u32> {
        match kind {
            RiderKind::WaiverOfPremium => {
                self.store.max_issue_age_for_waiver(company, key.term, key.tobacco_use)
            }
            _ => self
                .store
                .tables(company)
                .rider_table(kind)
                .max_age(key.term, key.tobacco_use),
        }
    }
}

fn available_rider(rules: &ProductRuleSet, kind: RiderKind) -> Option<&RiderRule> {
    rules.rider_rule(kind).filter(|rule| rule.available)
}

fn unsupported(company: &str, kind: RiderKind) -> String {
    format!("{} does not support {}.", company, kind.label())
}

fn missing_rate(company: &str, kind: RiderKind, key: &RiderKey) -> String {
    match kind {
        RiderKind::Child => format!("Child Rider rate not found for {}.", company),
        _ => format!(
            "{} is not available for Age {}, Term {}, TobaccoUse: {} in {}.",
            kind.label(),
            key.age,
            key.term,
            key.tobacco_use,
            company
        ),
    }
}

fn over_age(company: &str, kind: RiderKind, max_age: u32, age: u32) -> String {
    format!(
        "Maximum issue age for {} in {} is {}, but given age is {}.",
        kind.label(),
        company,
        max_age,
        age
    )
}
