//! Quote request structures and batch loading

mod data;
pub mod loader;

pub use data::{Gender, NormalizedRequest, QuoteRequest, RiderSelection, ALL_COMPANIES};
pub use loader::{load_requests, load_requests_from_reader};
