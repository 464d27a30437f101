//! Premium calculations
//!
//! Pure decimal arithmetic; nothing is rounded here. Presentation rounding
//! happens on the quote result.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Rates are quoted per thousand of coverage
const PER_THOUSAND: Decimal = dec!(1000);

/// Decimal places used when presenting monetary values
pub const MONEY_SCALE: u32 = 4;

/// `(face_amount / 1000) * rate_per_thousand`
pub fn base_annual_premium(face_amount: Decimal, rate_per_thousand: Decimal) -> Decimal {
    face_amount / PER_THOUSAND * rate_per_thousand
}

pub fn base_monthly_premium(
    face_amount: Decimal,
    rate_per_thousand: Decimal,
    monthly_modal_factor: Decimal,
) -> Decimal {
    base_annual_premium(face_amount, rate_per_thousand) * monthly_modal_factor
}

/// Base annual premium plus policy fee plus all rider premiums
pub fn annual_premium(
    face_amount: Decimal,
    rate_per_thousand: Decimal,
    policy_fee: Decimal,
    rider_premium_total: Decimal,
) -> Decimal {
    base_annual_premium(face_amount, rate_per_thousand) + policy_fee + rider_premium_total
}

pub fn monthly_premium(annual_premium: Decimal, monthly_modal_factor: Decimal) -> Decimal {
    annual_premium * monthly_modal_factor
}

/// Rider premium on whichever amount the rider is priced on
pub fn rider_premium(amount: Decimal, rate_per_thousand: Decimal) -> Decimal {
    amount / PER_THOUSAND * rate_per_thousand
}

/// Complete premium figures for one quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PremiumBreakdown {
    pub base_annual: Decimal,
    pub base_monthly: Decimal,
    pub rider_total: Decimal,
    pub annual: Decimal,
    pub monthly: Decimal,
}

impl PremiumBreakdown {
    pub fn calculate(
        face_amount: Decimal,
        rate_per_thousand: Decimal,
        policy_fee: Decimal,
        monthly_modal_factor: Decimal,
        rider_total: Decimal,
    ) -> Self {
        let base_annual = base_annual_premium(face_amount, rate_per_thousand);
        let annual = annual_premium(face_amount, rate_per_thousand, policy_fee, rider_total);
        Self {
            base_annual,
            base_monthly: base_monthly_premium(face_amount, rate_per_thousand, monthly_modal_factor),
            rider_total,
            annual,
            monthly: monthly_premium(annual, monthly_modal_factor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_arithmetic() {
        let breakdown = PremiumBreakdown::calculate(
            dec!(100000),
            dec!(1.2345),
            dec!(50),
            dec!(0.0845),
            Decimal::ZERO,
        );

        assert_eq!(breakdown.base_annual, dec!(123.45));
        assert_eq!(breakdown.annual, dec!(173.45));
        assert_eq!(breakdown.monthly, dec!(173.45) * dec!(0.0845));
        assert_eq!(breakdown.monthly, dec!(14.656525));
        assert_eq!(breakdown.base_monthly, dec!(123.45) * dec!(0.0845));
    }

    #[test]
    fn test_riders_add_to_annual() {
        let waiver = rider_premium(dec!(100000), dec!(0.2));
        let child = rider_premium(dec!(10000), dec!(2.5));
        assert_eq!(waiver, dec!(20));
        assert_eq!(child, dec!(25));

        let breakdown = PremiumBreakdown::calculate(
            dec!(100000),
            dec!(1.2345),
            dec!(50),
            dec!(0.0875),
            waiver + child,
        );
        assert_eq!(breakdown.annual, dec!(218.45));
        assert_eq!(breakdown.rider_total, dec!(45));
        assert_eq!(breakdown.monthly, dec!(218.45) * dec!(0.0875));
        // base figures exclude riders
        assert_eq!(breakdown.base_annual, dec!(123.45));
    }

    #[test]
    fn test_no_floating_point_drift() {
        let annual = base_annual_premium(dec!(333333), dec!(0.1));
        assert_eq!(annual, dec!(33.3333));
    }
}
