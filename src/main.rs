//! Term Quoter CLI
//!
//! Quote one company or every registered company for a single applicant

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use rust_decimal::Decimal;
use std::path::PathBuf;

use term_quoter::rates::DEFAULT_RATE_TABLE_PATH;
use term_quoter::request::ALL_COMPANIES;
use term_quoter::{
    CompanyQuote, Gender, QuoteConfig, QuoteEngine, QuoteError, QuoteRequest, QuoteResult,
    RiderSelection,
};

#[derive(Debug, Parser)]
#[command(name = "term_quoter", version, about = "Quote term life premiums across companies")]
struct Args {
    /// Rate table root directory
    #[arg(long, env = "TERM_QUOTER_RATES", default_value = DEFAULT_RATE_TABLE_PATH)]
    rates: PathBuf,

    /// Company to quote, or "all"
    #[arg(long, default_value = ALL_COMPANIES)]
    company: String,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    dob: NaiveDate,

    /// Male or Female
    #[arg(long)]
    gender: String,

    /// State or region name
    #[arg(long)]
    state: String,

    /// Term in years
    #[arg(long)]
    term: u32,

    #[arg(long)]
    face_amount: Decimal,

    /// Health class code (PP, P, RP, R)
    #[arg(long)]
    health_class: String,

    #[arg(long)]
    tobacco: bool,

    /// Add waiver of premium
    #[arg(long)]
    waiver: bool,

    /// Add accidental death benefit
    #[arg(long)]
    accidental_death: bool,

    #[arg(long)]
    child_rider_amount: Option<Decimal>,

    /// Compute ages as of this date instead of today
    #[arg(long, env = "TERM_QUOTER_AS_OF")]
    as_of: Option<NaiveDate>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl Args {
    fn to_request(&self) -> Result<QuoteRequest> {
        let gender = Gender::parse(&self.gender)
            .ok_or_else(|| anyhow!("Unknown gender '{}'", self.gender))?;

        Ok(QuoteRequest {
            company: Some(self.company.clone()),
            date_of_birth: self.dob,
            gender,
            state: self.state.clone(),
            term: self.term,
            face_amount: self.face_amount,
            health_class: self.health_class.clone(),
            tobacco_use: self.tobacco,
            riders: RiderSelection {
                waiver_of_premium: self.waiver,
                accidental_death: self.accidental_death,
                child_rider_amount: self.child_rider_amount,
            },
        })
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let request = args.to_request()?;

    let config = QuoteConfig {
        rate_table_dir: args.rates.clone(),
        as_of: args.as_of,
        ..QuoteConfig::default()
    };
    let engine = QuoteEngine::from_config(config)
        .with_context(|| format!("Failed to load rate tables from {}", args.rates.display()))?;

    match engine.quote(&request) {
        Ok(results) => {
            let results: Vec<QuoteResult> = results.iter().map(QuoteResult::rounded).collect();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else if results.is_empty() {
                println!("No rate found for the given inputs");
            } else {
                print_table(&results);
            }
            Ok(())
        }
        Err(QuoteError::ValidationFailed(errors)) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&errors)?);
            } else {
                println!("Request is not valid:");
                for error in &errors {
                    println!("  - {}", error);
                }
            }
            std::process::exit(2);
        }
        Err(QuoteError::NoProductsMatch { failures }) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&failures)?);
            } else {
                print_failures(&failures);
            }
            std::process::exit(2);
        }
        Err(e) => Err(e.into()),
    }
}

fn print_table(results: &[QuoteResult]) {
    println!(
        "{:<8} {:<12} {:<6} {:>10} {:>14} {:>12} {:>14} {:>12}",
        "Company", "Product", "Rating", "Rate/1000", "Base Annual", "Riders", "Annual", "Monthly"
    );
    for quote in results {
        println!(
            "{:<8} {:<12} {:<6} {:>10} {:>14} {:>12} {:>14} {:>12}",
            quote.company_name,
            quote.product_name,
            quote.rating,
            quote.rate_per_thousand,
            quote.base_annual_premium,
            quote.rider_premium,
            quote.annual_premium,
            quote.monthly_premium,
        );
    }
}

fn print_failures(failures: &[CompanyQuote]) {
    println!("No products match the given inputs");
    for failure in failures {
        println!("{}:", failure.company_name);
        if failure.errors.is_empty() {
            println!("  - no rate found");
        }
        for error in &failure.errors {
            println!("  - {}", error);
        }
    }
}
