//! Product rule catalog: per-company underwriting rules, age and health class handling

mod age;
mod catalog;
pub mod health;
pub mod regions;
mod rules;

pub use age::{AgeDetermination, NEAREST_BIRTHDAY_WINDOW_DAYS};
pub use catalog::{Company, ProductCatalog};
pub use health::HealthClassTable;
pub use regions::{region_code, region_name};
pub use rules::{PremiumBasis, ProductRuleSet, RiderKind, RiderMaxAge, RiderRule};
