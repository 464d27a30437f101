//! Flat rate table rows and per-company table sets

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::products::RiderKind;

/// Kinds of flat table kept per company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    BaseRate,
    Waiver,
    Child,
    Accident,
    SheetDefinition,
}

impl TableKind {
    pub const ALL: [TableKind; 5] = [
        TableKind::BaseRate,
        TableKind::Waiver,
        TableKind::Child,
        TableKind::Accident,
        TableKind::SheetDefinition,
    ];

    /// File name suffix after the lowercased company name
    pub fn file_suffix(&self) -> &'static str {
        match self {
            TableKind::BaseRate => "rates.csv",
            TableKind::Waiver => "wop_rates.csv",
            TableKind::Child => "cr_rates.csv",
            TableKind::Accident => "adb_rates.csv",
            TableKind::SheetDefinition => "sheets.csv",
        }
    }

    /// File name for a company, e.g. `hdfc_wop_rates.csv`
    pub fn file_name(&self, company: &str) -> String {
        format!("{}_{}", company.to_lowercase(), self.file_suffix())
    }

    pub fn for_rider(kind: RiderKind) -> Self {
        match kind {
            RiderKind::WaiverOfPremium => TableKind::Waiver,
            RiderKind::Child => TableKind::Child,
            RiderKind::AccidentalDeath => TableKind::Accident,
        }
    }
}

/// One base premium rate, unique per (term, age, gender, health class, face band)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTableRow {
    pub gender: String,
    pub term: u32,
    pub age: u32,
    pub health_class: String,
    pub rate_per_thousand: Decimal,
    pub policy_fee: Decimal,
    pub min_face_amount: Decimal,
    pub max_face_amount: Decimal,
}

impl RateTableRow {
    /// Face amount band check, inclusive on both ends
    pub fn covers_face_amount(&self, face_amount: Decimal) -> bool {
        face_amount >= self.min_face_amount && face_amount <= self.max_face_amount
    }
}

/// One rider rate; key columns absent from a table's schema are `None`
/// and match any lookup value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiderRateRow {
    pub term: Option<u32>,
    pub age: Option<u32>,
    pub tobacco_use: Option<bool>,
    pub rate_per_thousand: Decimal,
}

/// Lookup key for rider rates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiderKey {
    pub age: u32,
    pub term: u32,
    pub tobacco_use: bool,
}

impl RiderRateRow {
    pub fn matches(&self, key: &RiderKey) -> bool {
        self.term.map_or(true, |term| term == key.term)
            && self.age.map_or(true, |age| age == key.age)
            && self.tobacco_use.map_or(true, |tobacco| tobacco == key.tobacco_use)
    }
}

/// Rows of a single rider table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiderRateTable {
    pub rows: Vec<RiderRateRow>,
}

impl RiderRateTable {
    pub fn new(rows: Vec<RiderRateRow>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row matching the key
    pub fn find(&self, key: &RiderKey) -> Option<Decimal> {
        self.rows
            .iter()
            .find(|row| row.matches(key))
            .map(|row| row.rate_per_thousand)
    }

    /// Highest age among rows matching term and tobacco use
    pub fn max_age(&self, term: u32, tobacco_use: bool) -> Option<u32> {
        self.rows
            .iter()
            .filter(|row| row.term.map_or(true, |t| t == term))
            .filter(|row| row.tobacco_use.map_or(true, |t| t == tobacco_use))
            .filter_map(|row| row.age)
            .max()
    }
}

/// Rate sheet layout row; only used to discover age bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetDefinitionRow {
    pub term: u32,
    pub gender: String,
    pub health_class: String,
    pub min_face_amount: Decimal,
    pub max_face_amount: Decimal,
    pub min_age: u32,
    pub max_age: u32,
}

/// All flat tables for one company
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyRateTables {
    pub base_rates: Vec<RateTableRow>,
    pub waiver: RiderRateTable,
    pub child: RiderRateTable,
    pub accident: RiderRateTable,
    pub sheets: Vec<SheetDefinitionRow>,
}

impl CompanyRateTables {
    pub fn rider_table(&self, kind: RiderKind) -> &RiderRateTable {
        match kind {
            RiderKind::WaiverOfPremium => &self.waiver,
            RiderKind::Child => &self.child,
            RiderKind::AccidentalDeath => &self.accident,
        }
    }

    /// Row count per table, for logging
    pub fn row_counts(&self) -> [(TableKind, usize); 5] {
        [
            (TableKind::BaseRate, self.base_rates.len()),
            (TableKind::Waiver, self.waiver.rows.len()),
            (TableKind::Child, self.child.rows.len()),
            (TableKind::Accident, self.accident.rows.len()),
            (TableKind::SheetDefinition, self.sheets.len()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rider_row(term: Option<u32>, age: Option<u32>, tobacco: Option<bool>, rate: Decimal) -> RiderRateRow {
        RiderRateRow { term, age, tobacco_use: tobacco, rate_per_thousand: rate }
    }

    #[test]
    fn test_file_names() {
        assert_eq!(TableKind::BaseRate.file_name("HDFC"), "hdfc_rates.csv");
        assert_eq!(TableKind::Waiver.file_name("Icici"), "icici_wop_rates.csv");
        assert_eq!(TableKind::for_rider(RiderKind::Child), TableKind::Child);
    }

    #[test]
    fn test_flat_rider_table_matches_anything() {
        let table = RiderRateTable::new(vec![rider_row(None, None, None, dec!(0.45))]);
        let key = RiderKey { age: 40, term: 20, tobacco_use: true };
        assert_eq!(table.find(&key), Some(dec!(0.45)));
        assert_eq!(table.max_age(20, true), None);
    }

    #[test]
    fn test_keyed_rider_table() {
        let table = RiderRateTable::new(vec![
            rider_row(Some(10), Some(30), Some(false), dec!(0.10)),
            rider_row(Some(10), Some(31), Some(false), dec!(0.11)),
            rider_row(Some(10), Some(45), Some(true), dec!(0.30)),
            rider_row(Some(20), Some(50), Some(false), dec!(0.50)),
        ]);

        let key = RiderKey { age: 31, term: 10, tobacco_use: false };
        assert_eq!(table.find(&key), Some(dec!(0.11)));
        assert_eq!(table.find(&RiderKey { tobacco_use: true, ..key }), None);

        assert_eq!(table.max_age(10, false), Some(31));
        assert_eq!(table.max_age(10, true), Some(45));
        assert_eq!(table.max_age(15, false), None);
    }

    #[test]
    fn test_face_band_inclusive() {
        let row = RateTableRow {
            gender: "Male".to_string(),
            term: 20,
            age: 35,
            health_class: "Preferred Non-Tob".to_string(),
            rate_per_thousand: dec!(1.2345),
            policy_fee: dec!(50),
            min_face_amount: dec!(250000),
            max_face_amount: dec!(1000000),
        };
        assert!(row.covers_face_amount(dec!(250000)));
        assert!(row.covers_face_amount(dec!(1000000)));
        assert!(!row.covers_face_amount(dec!(1000001)));
    }
}
