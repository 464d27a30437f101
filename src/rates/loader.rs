//! CSV-based rate table loader
//!
//! Loads the flat tables produced from each company's rate sheets. Layout:
//! `<root>/<company>/<company>_<kind>.csv`, company lowercased.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use log::debug;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use super::tables::{
    CompanyRateTables, RateTableRow, RiderRateRow, RiderRateTable, SheetDefinitionRow, TableKind,
};
use crate::error::RateTableError;
use crate::request::loader::parse_flag;

/// Default path to the rate table directory
pub const DEFAULT_RATE_TABLE_PATH: &str = "data/rates";

/// Raw CSV row matching `<company>_rates.csv`
#[derive(Debug, serde::Deserialize)]
struct BaseRateCsvRow {
    #[serde(rename = "Term")]
    term: u32,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "MinimumFaceAmount")]
    min_face_amount: String,
    #[serde(rename = "MaximumFaceAmount")]
    max_face_amount: String,
    #[serde(rename = "PolicyFee")]
    policy_fee: String,
    #[serde(rename = "HealthClass")]
    health_class: String,
    #[serde(rename = "Age")]
    age: u32,
    #[serde(rename = "RatePerThousand")]
    rate_per_thousand: String,
}

impl BaseRateCsvRow {
    fn to_row(self) -> Result<RateTableRow, String> {
        Ok(RateTableRow {
            gender: self.gender,
            term: self.term,
            age: self.age,
            health_class: self.health_class,
            rate_per_thousand: parse_decimal("RatePerThousand", &self.rate_per_thousand)?,
            policy_fee: parse_decimal("PolicyFee", &self.policy_fee)?,
            min_face_amount: parse_decimal("MinimumFaceAmount", &self.min_face_amount)?,
            max_face_amount: parse_decimal("MaximumFaceAmount", &self.max_face_amount)?,
        })
    }
}

/// Raw CSV row for rider tables; key columns vary per company
#[derive(Debug, serde::Deserialize)]
struct RiderRateCsvRow {
    #[serde(rename = "Term", default)]
    term: Option<u32>,
    #[serde(rename = "Age", default)]
    age: Option<u32>,
    #[serde(rename = "TobaccoUse", default)]
    tobacco_use: Option<String>,
    #[serde(rename = "RatePerThousand")]
    rate_per_thousand: String,
}

impl RiderRateCsvRow {
    fn to_row(self) -> Result<RiderRateRow, String> {
        let tobacco_use = match self.tobacco_use.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_flag(raw).ok_or_else(|| format!("Unknown TobaccoUse: {}", raw))?),
        };

        Ok(RiderRateRow {
            term: self.term,
            age: self.age,
            tobacco_use,
            rate_per_thousand: parse_decimal("RatePerThousand", &self.rate_per_thousand)?,
        })
    }
}

/// Raw CSV row matching `<company>_sheets.csv`; layout columns are ignored
#[derive(Debug, serde::Deserialize)]
struct SheetDefinitionCsvRow {
    #[serde(rename = "Term")]
    term: u32,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "HealthClass")]
    health_class: String,
    #[serde(rename = "MinimumFaceAmount")]
    min_face_amount: String,
    #[serde(rename = "MaximumFaceAmount")]
    max_face_amount: String,
    #[serde(rename = "MinimumAge")]
    min_age: u32,
    #[serde(rename = "MaximumAge")]
    max_age: u32,
}

impl SheetDefinitionCsvRow {
    fn to_row(self) -> Result<SheetDefinitionRow, String> {
        Ok(SheetDefinitionRow {
            term: self.term,
            gender: self.gender,
            health_class: self.health_class,
            min_face_amount: parse_decimal("MinimumFaceAmount", &self.min_face_amount)?,
            max_face_amount: parse_decimal("MaximumFaceAmount", &self.max_face_amount)?,
            min_age: self.min_age,
            max_age: self.max_age,
        })
    }
}

fn parse_decimal(column: &str, value: &str) -> Result<Decimal, String> {
    value
        .trim()
        .parse::<Decimal>()
        .map_err(|_| format!("Invalid {}: {}", column, value))
}

/// Deserialize every row of a table, converting each raw row with `convert`
fn read_rows<R, Raw, T>(
    reader: R,
    source: &Path,
    convert: impl Fn(Raw) -> Result<T, String>,
) -> Result<Vec<T>, RateTableError>
where
    R: Read,
    Raw: DeserializeOwned,
{
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut rows = Vec::new();

    for (index, result) in csv_reader.deserialize::<Raw>().enumerate() {
        let raw = result.map_err(|source_err| RateTableError::Csv {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        let row = convert(raw).map_err(|message| RateTableError::InvalidRow {
            path: source.to_path_buf(),
            // header is line 1
            line: index as u64 + 2,
            message,
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Load base rate rows from any reader; `source` names the table in errors
pub fn load_base_rates<R: Read>(reader: R, source: &Path) -> Result<Vec<RateTableRow>, RateTableError> {
    read_rows(reader, source, BaseRateCsvRow::to_row)
}

/// Load a rider rate table from any reader
pub fn load_rider_rates<R: Read>(reader: R, source: &Path) -> Result<RiderRateTable, RateTableError> {
    read_rows(reader, source, RiderRateCsvRow::to_row).map(RiderRateTable::new)
}

/// Load sheet definition rows from any reader
pub fn load_sheet_definitions<R: Read>(
    reader: R,
    source: &Path,
) -> Result<Vec<SheetDefinitionRow>, RateTableError> {
    read_rows(reader, source, SheetDefinitionCsvRow::to_row)
}

/// Path of one company table under the rate table root
pub fn table_path(root: &Path, company: &str, kind: TableKind) -> PathBuf {
    root.join(company.to_lowercase()).join(kind.file_name(company))
}

/// Open a table file, or `None` when the company has no such table
fn open_table(path: &Path) -> Result<Option<File>, RateTableError> {
    if !path.exists() {
        debug!("No rate table at {}", path.display());
        return Ok(None);
    }
    File::open(path).map(Some).map_err(|source| RateTableError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load every table for one company; missing files become empty tables
pub fn load_company_tables(root: &Path, company: &str) -> Result<CompanyRateTables, RateTableError> {
    let mut tables = CompanyRateTables::default();

    for kind in TableKind::ALL {
        let path = table_path(root, company, kind);
        let Some(file) = open_table(&path)? else {
            continue;
        };

        match kind {
            TableKind::BaseRate => tables.base_rates = load_base_rates(file, &path)?,
            TableKind::Waiver => tables.waiver = load_rider_rates(file, &path)?,
            TableKind::Child => tables.child = load_rider_rates(file, &path)?,
            TableKind::Accident => tables.accident = load_rider_rates(file, &path)?,
            TableKind::SheetDefinition => tables.sheets = load_sheet_definitions(file, &path)?,
        }
    }

    Ok(tables)
}
