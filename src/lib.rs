//! Term Quoter - Multi-company term life insurance quote engine
//!
//! This library provides:
//! - Per-company product rules (ages, terms, face amounts, regions, riders)
//! - Flat CSV rate tables for base rates, riders and sheet definitions
//! - Request validation that collects every business-rule failure
//! - Decimal premium arithmetic (annual, monthly, riders)
//! - Single-company and fan-out quoting across all registered companies

pub mod config;
pub mod error;
pub mod premium;
pub mod products;
pub mod quote;
pub mod rates;
pub mod request;
pub mod validation;

#[cfg(test)]
mod fixtures;

// Re-export commonly used types
pub use config::QuoteConfig;
pub use error::{QuoteError, RateTableError, RequestLoadError};
pub use products::{Company, ProductCatalog, ProductRuleSet};
pub use quote::{CompanyQuote, QuoteEngine, QuoteResult};
pub use rates::RateTableStore;
pub use request::{Gender, QuoteRequest, RiderSelection};
