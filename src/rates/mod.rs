//! Rate table store: flat per-company base, rider and sheet-definition tables

pub mod loader;
mod store;
mod tables;

pub use loader::{load_company_tables, DEFAULT_RATE_TABLE_PATH};
pub use store::{BaseRateQuery, RateTableStore};
pub use tables::{
    CompanyRateTables, RateTableRow, RiderKey, RiderRateRow, RiderRateTable, SheetDefinitionRow,
    TableKind,
};
