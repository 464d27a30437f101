//! Read-only rate table store keyed by company
//!
//! Tables are loaded once and treated as an immutable snapshot, so the store
//! can be shared across threads without locking.

use std::collections::HashMap;
use std::path::Path;

use log::{debug, info};
use rust_decimal::Decimal;

use super::loader::load_company_tables;
use super::tables::{CompanyRateTables, RateTableRow, RiderKey};
use crate::error::RateTableError;
use crate::products::RiderKind;
use crate::request::Gender;

/// Base rate lookup key
#[derive(Debug, Clone, Copy)]
pub struct BaseRateQuery<'a> {
    pub term: u32,
    pub age: u32,
    pub gender: Gender,
    pub health_class: &'a str,
    pub face_amount: Decimal,
}

/// Flat tables for every loaded company
#[derive(Debug, Clone, Default)]
pub struct RateTableStore {
    /// Keyed by lowercased company name
    companies: HashMap<String, CompanyRateTables>,
}

static EMPTY_TABLES: std::sync::OnceLock<CompanyRateTables> = std::sync::OnceLock::new();

impl RateTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load tables for the given companies from a rate table root directory
    pub fn from_dir<'a>(
        root: &Path,
        companies: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, RateTableError> {
        let mut store = Self::new();
        for company in companies {
            let tables = load_company_tables(root, company)?;
            for (kind, count) in tables.row_counts() {
                debug!("{} {:?}: {} rows", company, kind, count);
            }
            info!(
                "Loaded {} base rate rows for {} from {}",
                tables.base_rates.len(),
                company,
                root.display()
            );
            store.insert(company, tables);
        }
        Ok(store)
    }

    /// Register (or replace) the tables for a company
    pub fn insert(&mut self, company: &str, tables: CompanyRateTables) {
        self.companies.insert(company.to_lowercase(), tables);
    }

    /// Builder-style variant of [`insert`](Self::insert)
    pub fn with_company(mut self, company: &str, tables: CompanyRateTables) -> Self {
        self.insert(company, tables);
        self
    }

    /// Tables for a company; unknown companies have empty tables
    pub fn tables(&self, company: &str) -> &CompanyRateTables {
        self.companies
            .get(&company.to_lowercase())
            .unwrap_or_else(|| EMPTY_TABLES.get_or_init(CompanyRateTables::default))
    }

    /// First base rate row matching the key with a face band containing the amount
    pub fn find_base_rate(&self, company: &str, query: &BaseRateQuery<'_>) -> Option<&RateTableRow> {
        let found = self.tables(company).base_rates.iter().find(|row| {
            row.gender.eq_ignore_ascii_case(query.gender.as_str())
                && row.health_class.eq_ignore_ascii_case(query.health_class)
                && row.term == query.term
                && row.age == query.age
                && row.covers_face_amount(query.face_amount)
        });

        if found.is_none() {
            debug!(
                "{}: no base rate for term {} age {} {} '{}' face {}",
                company, query.term, query.age, query.gender, query.health_class, query.face_amount
            );
        }
        found
    }

    /// Rider rate for the key; flat tables return their single rate
    pub fn find_rider_rate(&self, company: &str, kind: RiderKind, key: &RiderKey) -> Option<Decimal> {
        self.tables(company).rider_table(kind).find(key)
    }

    pub fn find_child_rider_rate(&self, company: &str, key: &RiderKey) -> Option<Decimal> {
        self.find_rider_rate(company, RiderKind::Child, key)
    }

    pub fn find_waiver_rider_rate(&self, company: &str, key: &RiderKey) -> Option<Decimal> {
        self.find_rider_rate(company, RiderKind::WaiverOfPremium, key)
    }

    pub fn find_accident_rider_rate(&self, company: &str, key: &RiderKey) -> Option<Decimal> {
        self.find_rider_rate(company, RiderKind::AccidentalDeath, key)
    }

    /// Highest age in the waiver table for the term and tobacco use
    pub fn max_issue_age_for_waiver(&self, company: &str, term: u32, tobacco_use: bool) -> Option<u32> {
        self.tables(company).waiver.max_age(term, tobacco_use)
    }

    /// Highest age band upper bound among sheet rows for the term, class and gender
    pub fn max_age_from_sheet_definition(
        &self,
        company: &str,
        term: u32,
        health_class: &str,
        gender: Gender,
    ) -> Option<u32> {
        self.tables(company)
            .sheets
            .iter()
            .filter(|row| {
                row.term == term
                    && row.gender.eq_ignore_ascii_case(gender.as_str())
                    && row.health_class.eq_ignore_ascii_case(health_class)
            })
            .map(|row| row.max_age)
            .max()
    }
}
