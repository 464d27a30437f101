//! Quote a batch of requests from CSV
//!
//! Writes one output row per request and company, including the error text
//! for companies that could not quote

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use term_quoter::rates::DEFAULT_RATE_TABLE_PATH;
use term_quoter::request::load_requests;
use term_quoter::{CompanyQuote, QuoteConfig, QuoteEngine, QuoteError, QuoteRequest};

#[derive(Debug, Parser)]
#[command(name = "quote_batch", about = "Quote every request in a CSV file")]
struct Args {
    /// Request CSV (Company, DateOfBirth, Gender, State, Term, FaceAmount, ...)
    input: PathBuf,

    #[arg(long, default_value = "quote_batch_output.csv")]
    output: PathBuf,

    #[arg(long, env = "TERM_QUOTER_RATES", default_value = DEFAULT_RATE_TABLE_PATH)]
    rates: PathBuf,

    #[arg(long, env = "TERM_QUOTER_AS_OF")]
    as_of: Option<NaiveDate>,
}

/// One output row per request and company
#[derive(Debug, Serialize)]
struct OutputRow {
    #[serde(rename = "Request")]
    request: usize,
    #[serde(rename = "Company")]
    company: String,
    #[serde(rename = "Product")]
    product: String,
    #[serde(rename = "RatePerThousand")]
    rate_per_thousand: Option<Decimal>,
    #[serde(rename = "BaseAnnualPremium")]
    base_annual_premium: Option<Decimal>,
    #[serde(rename = "RiderPremium")]
    rider_premium: Option<Decimal>,
    #[serde(rename = "AnnualPremium")]
    annual_premium: Option<Decimal>,
    #[serde(rename = "MonthlyPremium")]
    monthly_premium: Option<Decimal>,
    #[serde(rename = "Errors")]
    errors: String,
}

impl OutputRow {
    fn from_outcome(request: usize, outcome: &CompanyQuote) -> Self {
        let quote = outcome.quote.as_ref().map(|quote| quote.rounded());
        let errors = if quote.is_none() && outcome.errors.is_empty() {
            "No rate found".to_string()
        } else {
            outcome.errors.join("; ")
        };
        Self {
            request,
            company: outcome.company_name.clone(),
            product: quote.as_ref().map(|q| q.product_name.clone()).unwrap_or_default(),
            rate_per_thousand: quote.as_ref().map(|q| q.rate_per_thousand),
            base_annual_premium: quote.as_ref().map(|q| q.base_annual_premium),
            rider_premium: quote.as_ref().map(|q| q.rider_premium),
            annual_premium: quote.as_ref().map(|q| q.annual_premium),
            monthly_premium: quote.as_ref().map(|q| q.monthly_premium),
            errors,
        }
    }

    fn failed(request: usize, company: &str, error: &QuoteError) -> Self {
        Self {
            request,
            company: company.to_string(),
            product: String::new(),
            rate_per_thousand: None,
            base_annual_premium: None,
            rider_premium: None,
            annual_premium: None,
            monthly_premium: None,
            errors: error.to_string(),
        }
    }
}

/// Outcomes for one request: every company on fan-out, else the named one
fn quote_request(engine: &QuoteEngine, index: usize, request: &QuoteRequest) -> Vec<OutputRow> {
    if request.selects_all() {
        return engine
            .quote_each(request)
            .iter()
            .map(|outcome| OutputRow::from_outcome(index, outcome))
            .collect();
    }

    let company = request.company.as_deref().unwrap_or_default();
    let outcome = match engine.quote_company(company, request) {
        Ok(quote) => CompanyQuote {
            company_name: company.to_string(),
            quote,
            errors: Vec::new(),
        },
        Err(QuoteError::ValidationFailed(errors)) => CompanyQuote {
            company_name: company.to_string(),
            quote: None,
            errors,
        },
        Err(e) => return vec![OutputRow::failed(index, company, &e)],
    };
    vec![OutputRow::from_outcome(index, &outcome)]
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading requests from {}...", args.input.display());
    let requests = load_requests(&args.input)
        .with_context(|| format!("Failed to load requests from {}", args.input.display()))?;
    println!("Loaded {} requests in {:?}", requests.len(), start.elapsed());

    let config = QuoteConfig {
        rate_table_dir: args.rates.clone(),
        as_of: args.as_of,
        // requests are already spread across threads
        parallel: false,
    };
    let engine = QuoteEngine::from_config(config)
        .with_context(|| format!("Failed to load rate tables from {}", args.rates.display()))?;

    println!("Quoting...");
    let quote_start = Instant::now();
    let rows: Vec<Vec<OutputRow>> = requests
        .par_iter()
        .enumerate()
        .map(|(index, request)| quote_request(&engine, index + 1, request))
        .collect();
    println!("Quoting complete in {:?}", quote_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut quoted = 0;
    let mut total = 0;
    for row in rows.iter().flatten() {
        if row.annual_premium.is_some() {
            quoted += 1;
        }
        total += 1;
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!("Output written to {}", args.output.display());
    println!("\nBatch Summary:");
    println!("  Requests: {}", requests.len());
    println!("  Quotes:   {} of {} company rows", quoted, total);
    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
