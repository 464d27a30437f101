//! Quote orchestration and results

mod engine;
mod result;

pub use engine::QuoteEngine;
pub use result::{CompanyQuote, QuoteResult};
