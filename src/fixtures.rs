//! Shared in-memory rate tables and requests for unit tests

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use crate::rates::loader::{load_base_rates, load_rider_rates, load_sheet_definitions};
use crate::rates::{CompanyRateTables, RateTableStore, RiderRateTable};
use crate::request::{Gender, QuoteRequest, RiderSelection};

/// Valuation date used by fixtures; `request()` is age 35 on this date under both methods
pub fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

const RATES_HEADER: &str =
    "Term,Gender,MinimumFaceAmount,MaximumFaceAmount,PolicyFee,HealthClass,Age,RatePerThousand\n";

const SHEETS_HEADER: &str =
    "SheetNo,Term,Gender,MinimumFaceAmount,MaximumFaceAmount,PolicyFee,HealthClass,MinimumAge,MaximumAge,StartingRow,Column\n";

fn base_rates(body: &str) -> Vec<crate::rates::RateTableRow> {
    let csv = format!("{}{}", RATES_HEADER, body);
    load_base_rates(csv.as_bytes(), Path::new("fixture_rates.csv")).unwrap()
}

fn rider(csv: &str) -> RiderRateTable {
    load_rider_rates(csv.as_bytes(), Path::new("fixture_rider.csv")).unwrap()
}

fn sheets(body: &str) -> Vec<crate::rates::SheetDefinitionRow> {
    let csv = format!("{}{}", SHEETS_HEADER, body);
    load_sheet_definitions(csv.as_bytes(), Path::new("fixture_sheets.csv")).unwrap()
}

pub fn hdfc_tables() -> CompanyRateTables {
    CompanyRateTables {
        base_rates: base_rates(
            "20,Male,100000,100000000,50,Preferred Non-Tob,35,1.2345\n\
             20,Female,100000,100000000,50,Preferred Non-Tob,35,1.0500\n\
             20,Male,100000,100000000,50,Preferred Tob,35,2.4000\n",
        ),
        waiver: rider("Age,RatePerThousand\n35,0.2000\n36,0.2100\n"),
        child: rider("Age,RatePerThousand\n35,0.5000\n"),
        accident: rider("Age,RatePerThousand\n35,0.3000\n"),
        sheets: sheets(
            "1,20,Male,100000,100000000,50,Preferred Non-Tob,20,60,5,3\n\
             1,20,Male,100000,100000000,50,Preferred Tob,20,30,5,4\n",
        ),
    }
}

pub fn icici_tables() -> CompanyRateTables {
    CompanyRateTables {
        base_rates: base_rates("20,Male,100000,10000000,0,Preferred Non-Tob,35,1.1000\n"),
        waiver: rider(
            "Term,Age,TobaccoUse,RatePerThousand\n\
             20,35,False,0.2500\n\
             20,40,False,0.3000\n\
             20,33,True,0.4500\n",
        ),
        child: rider("RatePerThousand\n2.5000\n"),
        accident: RiderRateTable::default(),
        sheets: Vec::new(),
    }
}

pub fn kotak_tables() -> CompanyRateTables {
    CompanyRateTables {
        base_rates: base_rates("20,Male,100000,10000000,40,Preferred Non-Tob,35,1.3000\n"),
        ..CompanyRateTables::default()
    }
}

pub fn sbi_tables() -> CompanyRateTables {
    CompanyRateTables {
        base_rates: base_rates("20,Male,100000,9999999,60,Preferred Non-Tob,35,1.4000\n"),
        ..CompanyRateTables::default()
    }
}

pub fn store() -> RateTableStore {
    RateTableStore::new()
        .with_company("HDFC", hdfc_tables())
        .with_company("ICICI", icici_tables())
        .with_company("KOTAK", kotak_tables())
        .with_company("SBI", sbi_tables())
}

/// Valid request for every registered product: male, 35, term 20, "P", non-tobacco
pub fn request(company: Option<&str>) -> QuoteRequest {
    QuoteRequest {
        company: company.map(str::to_string),
        date_of_birth: NaiveDate::from_ymd_opt(1989, 12, 1).unwrap(),
        gender: Gender::Male,
        state: "Karnataka".to_string(),
        term: 20,
        face_amount: dec!(500000),
        health_class: "P".to_string(),
        tobacco_use: false,
        riders: RiderSelection::default(),
    }
}
