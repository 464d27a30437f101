//! Quote engine configuration

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::rates::DEFAULT_RATE_TABLE_PATH;

/// Configuration for a quote engine
#[derive(Debug, Clone)]
pub struct QuoteConfig {
    /// Root directory holding one sub-directory of flat tables per company
    pub rate_table_dir: PathBuf,

    /// Date ages are computed on; `None` means today's local date
    pub as_of: Option<NaiveDate>,

    /// Quote companies in parallel when fanning out
    pub parallel: bool,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            rate_table_dir: PathBuf::from(DEFAULT_RATE_TABLE_PATH),
            as_of: None,
            parallel: true,
        }
    }
}

impl QuoteConfig {
    /// Date issue ages are determined on
    pub fn valuation_date(&self) -> NaiveDate {
        self.as_of
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QuoteConfig::default();
        assert_eq!(config.rate_table_dir, PathBuf::from("data/rates"));
        assert!(config.parallel);
        assert!(config.as_of.is_none());
    }

    #[test]
    fn test_fixed_valuation_date() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let config = QuoteConfig { as_of: Some(date), ..QuoteConfig::default() };
        assert_eq!(config.valuation_date(), date);
    }
}
