//! Load a batch of quote requests from CSV

use super::{Gender, QuoteRequest, RiderSelection};
use crate::error::RequestLoadError;
use chrono::NaiveDate;
use csv::Reader;
use rust_decimal::Decimal;
use std::path::Path;

/// Raw CSV row matching the batch request columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Company", default)]
    company: Option<String>,
    #[serde(rename = "DateOfBirth")]
    date_of_birth: String,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Term")]
    term: u32,
    #[serde(rename = "FaceAmount")]
    face_amount: String,
    #[serde(rename = "HealthClass")]
    health_class: String,
    #[serde(rename = "TobaccoUse")]
    tobacco_use: String,
    #[serde(rename = "Waiver", default)]
    waiver: Option<String>,
    #[serde(rename = "AccidentalDeath", default)]
    accidental_death: Option<String>,
    #[serde(rename = "ChildRiderAmount", default)]
    child_rider_amount: Option<String>,
}

impl CsvRow {
    fn to_request(self, row: usize) -> Result<QuoteRequest, RequestLoadError> {
        let invalid = |message: String| RequestLoadError::InvalidField { row, message };

        let date_of_birth = NaiveDate::parse_from_str(self.date_of_birth.trim(), "%Y-%m-%d")
            .map_err(|_| invalid(format!("Unknown DateOfBirth: {}", self.date_of_birth)))?;

        let gender = Gender::parse(&self.gender)
            .ok_or_else(|| invalid(format!("Unknown Gender: {}", self.gender)))?;

        let face_amount: Decimal = self
            .face_amount
            .trim()
            .parse()
            .map_err(|_| invalid(format!("Unknown FaceAmount: {}", self.face_amount)))?;

        let tobacco_use = parse_flag(&self.tobacco_use)
            .ok_or_else(|| invalid(format!("Unknown TobaccoUse: {}", self.tobacco_use)))?;

        let waiver_of_premium = optional_flag(self.waiver.as_deref())
            .ok_or_else(|| invalid("Unknown Waiver flag".to_string()))?;
        let accidental_death = optional_flag(self.accidental_death.as_deref())
            .ok_or_else(|| invalid("Unknown AccidentalDeath flag".to_string()))?;

        let child_rider_amount = match self.child_rider_amount.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<Decimal>()
                    .map_err(|_| invalid(format!("Unknown ChildRiderAmount: {}", raw)))?,
            ),
        };

        Ok(QuoteRequest {
            company: self.company.filter(|c| !c.trim().is_empty()),
            date_of_birth,
            gender,
            state: self.state,
            term: self.term,
            face_amount,
            health_class: self.health_class.trim().to_string(),
            tobacco_use,
            riders: RiderSelection {
                waiver_of_premium,
                accidental_death,
                child_rider_amount,
            },
        })
    }
}

/// Parse a yes/no flag as written by spreadsheets and the rate-table generator
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Blank or missing flags mean "not requested"
fn optional_flag(value: Option<&str>) -> Option<bool> {
    match value.map(str::trim) {
        None | Some("") => Some(false),
        Some(raw) => parse_flag(raw),
    }
}

/// Load all quote requests from a CSV file
pub fn load_requests<P: AsRef<Path>>(path: P) -> Result<Vec<QuoteRequest>, RequestLoadError> {
    let reader = Reader::from_path(path)?;
    collect_requests(reader)
}

/// Load quote requests from any reader (e.g., string buffer, network stream)
pub fn load_requests_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<QuoteRequest>, RequestLoadError> {
    collect_requests(Reader::from_reader(reader))
}

fn collect_requests<R: std::io::Read>(
    mut reader: Reader<R>,
) -> Result<Vec<QuoteRequest>, RequestLoadError> {
    let mut requests = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        requests.push(row.to_request(index + 1)?);
    }

    Ok(requests)
}
