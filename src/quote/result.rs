//! Quote output structures

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::premium::MONEY_SCALE;

/// A priced quote for one company's product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub company_name: String,
    pub product_name: String,
    pub rating: String,
    pub rate_per_thousand: Decimal,
    pub base_annual_premium: Decimal,
    pub base_monthly_premium: Decimal,

    /// Sum of all rider premiums
    pub rider_premium: Decimal,

    /// Base annual premium plus policy fee plus riders
    pub annual_premium: Decimal,
    pub monthly_premium: Decimal,
}

impl QuoteResult {
    /// Copy with every monetary figure rounded for presentation
    pub fn rounded(&self) -> Self {
        let round = |value: Decimal| {
            value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
        };
        Self {
            company_name: self.company_name.clone(),
            product_name: self.product_name.clone(),
            rating: self.rating.clone(),
            rate_per_thousand: self.rate_per_thousand,
            base_annual_premium: round(self.base_annual_premium),
            base_monthly_premium: round(self.base_monthly_premium),
            rider_premium: round(self.rider_premium),
            annual_premium: round(self.annual_premium),
            monthly_premium: round(self.monthly_premium),
        }
    }
}

/// Outcome of quoting one company during fan-out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyQuote {
    pub company_name: String,

    /// `None` when validation failed or the rate tables have no matching row
    pub quote: Option<QuoteResult>,

    pub errors: Vec<String>,
}

impl CompanyQuote {
    pub fn is_quoted(&self) -> bool {
        self.quote.is_some()
    }
}
