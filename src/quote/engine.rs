//! Quote orchestration: resolve, age, validate, price

use log::{debug, info, warn};
use rayon::prelude::*;
use rust_decimal::Decimal;

use super::result::{CompanyQuote, QuoteResult};
use crate::config::QuoteConfig;
use crate::error::QuoteError;
use crate::premium::{rider_premium, PremiumBreakdown};
use crate::products::{PremiumBasis, ProductCatalog, ProductRuleSet, RiderKind};
use crate::rates::{BaseRateQuery, RateTableStore, RiderKey};
use crate::request::QuoteRequest;
use crate::validation::Validator;

/// Main quote engine
///
/// Holds the product catalog and an immutable rate table snapshot, so a
/// single engine can serve concurrent requests.
pub struct QuoteEngine {
    catalog: ProductCatalog,
    store: RateTableStore,
    config: QuoteConfig,
}

impl QuoteEngine {
    pub fn new(catalog: ProductCatalog, store: RateTableStore, config: QuoteConfig) -> Self {
        Self { catalog, store, config }
    }

    /// Standard catalog with rate tables loaded from the configured directory
    pub fn from_config(config: QuoteConfig) -> Result<Self, QuoteError> {
        let catalog = ProductCatalog::standard();
        let store = RateTableStore::from_dir(&config.rate_table_dir, catalog.company_names())?;
        Ok(Self::new(catalog, store, config))
    }

    /// Quote one company, or every registered company when none is named
    ///
    /// A single company yields at most one result; an empty list means the
    /// request was valid but the rate tables had no matching row. Fan-out
    /// fails with [`QuoteError::NoProductsMatch`] only when no company quoted.
    pub fn quote(&self, request: &QuoteRequest) -> Result<Vec<QuoteResult>, QuoteError> {
        if !request.selects_all() {
            let name = request.company.as_deref().unwrap_or_default();
            let rules = self.catalog.resolve(name)?;
            return Ok(self.quote_product(rules, request)?.into_iter().collect());
        }

        let outcomes = self.quote_each(request);
        let results: Vec<QuoteResult> = outcomes
            .iter()
            .filter_map(|outcome| outcome.quote.clone())
            .collect();

        if results.is_empty() {
            warn!("No company could quote the request");
            return Err(QuoteError::NoProductsMatch { failures: outcomes });
        }
        Ok(results)
    }

    /// Quote a named company
    pub fn quote_company(
        &self,
        company: &str,
        request: &QuoteRequest,
    ) -> Result<Option<QuoteResult>, QuoteError> {
        let rules = self.catalog.resolve(company)?;
        self.quote_product(rules, &request.for_company(&rules.company_name))
    }

    /// Per-company outcome for every registered company, in registration order
    pub fn quote_each(&self, request: &QuoteRequest) -> Vec<CompanyQuote> {
        let products = self.catalog.list_all();
        if self.config.parallel {
            products
                .par_iter()
                .map(|rules| self.company_outcome(rules, request))
                .collect()
        } else {
            products
                .iter()
                .map(|rules| self.company_outcome(rules, request))
                .collect()
        }
    }

    fn company_outcome(&self, rules: &ProductRuleSet, request: &QuoteRequest) -> CompanyQuote {
        let request = request.for_company(&rules.company_name);
        let (quote, errors) = match self.quote_product(rules, &request) {
            Ok(quote) => (quote, Vec::new()),
            Err(QuoteError::ValidationFailed(errors)) => {
                warn!(
                    "{}: {} validation error(s): {}",
                    rules.company_name,
                    errors.len(),
                    errors.join("; ")
                );
                (None, errors)
            }
            Err(e) => {
                warn!("{}: {}", rules.company_name, e);
                (None, vec![e.to_string()])
            }
        };
        CompanyQuote {
            company_name: rules.company_name.clone(),
            quote,
            errors,
        }
    }

    /// Age, validate and price one request against one product
    fn quote_product(
        &self,
        rules: &ProductRuleSet,
        request: &QuoteRequest,
    ) -> Result<Option<QuoteResult>, QuoteError> {
        let company = rules.company_name.as_str();
        let age = rules.compute_age_on(request.date_of_birth, self.config.valuation_date());
        debug!("{}: issue age {} ({:?})", company, age, rules.age_determination);

        let normalized = Validator::new(&self.store)
            .validate(request, rules, age)
            .into_result()?;

        // validation guarantees a health class label on success
        let Some(health_class) = normalized.health_class.as_deref() else {
            return Ok(None);
        };

        let query = BaseRateQuery {
            term: request.term,
            age,
            gender: request.gender,
            health_class,
            face_amount: request.face_amount,
        };
        let Some(base) = self.store.find_base_rate(company, &query) else {
            warn!(
                "{}: no rate for term {} age {} {} '{}'",
                company, request.term, age, request.gender, health_class
            );
            return Ok(None);
        };

        let Some(rider_total) = self.rider_total(rules, request, age) else {
            warn!("{}: rider rate missing for age {}", company, age);
            return Ok(None);
        };

        let premium = PremiumBreakdown::calculate(
            request.face_amount,
            base.rate_per_thousand,
            base.policy_fee,
            rules.monthly_modal_factor,
            rider_total,
        );

        info!(
            "{}: quoted {} annual {} monthly",
            company, premium.annual, premium.monthly
        );

        Ok(Some(QuoteResult {
            company_name: rules.company_name.clone(),
            product_name: rules.product_name.clone(),
            rating: rules.rating.clone(),
            rate_per_thousand: base.rate_per_thousand,
            base_annual_premium: premium.base_annual,
            base_monthly_premium: premium.base_monthly,
            rider_premium: premium.rider_total,
            annual_premium: premium.annual,
            monthly_premium: premium.monthly,
        }))
    }

    /// Sum of premiums for the riders the request selects
    fn rider_total(&self, rules: &ProductRuleSet, request: &QuoteRequest, age: u32) -> Option<Decimal> {
        let key = RiderKey {
            age,
            term: request.term,
            tobacco_use: request.tobacco_use,
        };
        let child_amount = request.riders.requested_child_amount();

        let selected = [
            (RiderKind::WaiverOfPremium, request.riders.waiver_of_premium),
            (RiderKind::Child, child_amount.is_some()),
            (RiderKind::AccidentalDeath, request.riders.accidental_death),
        ];

        let mut total = Decimal::ZERO;
        for (kind, _) in selected.iter().filter(|(_, chosen)| *chosen) {
            let rule = rules.rider_rule(*kind)?;
            let rate = self.store.find_rider_rate(&rules.company_name, *kind, &key)?;
            let amount = match rule.premium_basis {
                PremiumBasis::FaceAmount => request.face_amount,
                PremiumBasis::RiderAmount => child_amount.unwrap_or(request.face_amount),
            };
            let premium = rider_premium(amount, rate);
            debug!("{}: {} premium {}", rules.company_name, kind.label(), premium);
            total += premium;
        }
        Some(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RateTableError;
    use crate::fixtures::{as_of, request, store};
    use crate::products::Company;
    use rust_decimal_macros::dec;

    fn engine(parallel: bool) -> QuoteEngine {
        let config = QuoteConfig {
            as_of: Some(as_of()),
            parallel,
            ..QuoteConfig::default()
        };
        QuoteEngine::new(ProductCatalog::standard(), store(), config)
    }

    #[test]
    fn test_single_company_quote() {
        let mut req = request(Some("hdfc"));
        req.face_amount = dec!(100000);

        let results = engine(false).quote(&req).unwrap();
        assert_eq!(results.len(), 1);

        let quote = &results[0];
        assert_eq!(quote.company_name, "HDFC");
        assert_eq!(quote.product_name, "HDFC Term");
        assert_eq!(quote.rating, "A");
        assert_eq!(quote.rate_per_thousand, dec!(1.2345));
        assert_eq!(quote.base_annual_premium, dec!(123.45));
        assert_eq!(quote.rider_premium, dec!(0));
        assert_eq!(quote.annual_premium, dec!(173.45));
        assert_eq!(quote.monthly_premium, dec!(14.656525));
    }

    #[test]
    fn test_unknown_company() {
        let err = engine(false).quote(&request(Some("Acme"))).unwrap_err();
        assert!(matches!(err, QuoteError::CompanyNotFound(ref name) if name == "Acme"));
        assert_eq!(err.to_string(), "Company Acme is not supported");
    }

    #[test]
    fn test_single_company_validation_failure() {
        let mut req = request(Some("SBI"));
        req.term = 25;
        let err = engine(false).quote(&req).unwrap_err();
        assert_eq!(
            err.validation_errors(),
            ["Term '25' is invalid for SBI. Allowed: 10,15,20,30".to_string()]
        );
    }

    #[test]
    fn test_missing_rate_row_is_not_an_error() {
        let mut req = request(Some("KOTAK"));
        req.face_amount = dec!(200000);
        req.gender = crate::request::Gender::Female;
        let results = engine(false).quote(&req).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_rider_premiums_added() {
        let mut req = request(Some("HDFC"));
        req.face_amount = dec!(100000);
        req.riders.waiver_of_premium = true;
        req.riders.accidental_death = true;
        req.riders.child_rider_amount = Some(dec!(10000));

        let quote = engine(false).quote_company("HDFC", &req).unwrap().unwrap();
        // waiver 100 * 0.2, ADB 100 * 0.3, child 10 * 0.5
        assert_eq!(quote.rider_premium, dec!(55));
        assert_eq!(quote.annual_premium, dec!(228.45));
        assert_eq!(quote.monthly_premium, dec!(228.45) * dec!(0.0845));
    }

    #[test]
    fn test_fan_out_keeps_successes() {
        let mut req = request(None);
        req.state = "Maharashtra".to_string();

        let results = engine(true).quote(&req).unwrap();
        let names: Vec<_> = results.iter().map(|q| q.company_name.as_str()).collect();
        assert_eq!(names, vec!["HDFC", "ICICI"]);

        let outcomes = engine(true).quote_each(&req);
        assert_eq!(outcomes.len(), 4);
        assert!(!outcomes[2].is_quoted());
        assert_eq!(
            outcomes[3].errors,
            vec!["State 'Maharashtra' is not allowed for SBI. NotAllowed: Maharashtra, Madhya Pradesh, Uttar Pradesh".to_string()]
        );
    }

    #[test]
    fn test_fan_out_skips_company_failing_term() {
        let mut sbi = Company::Sbi.rule_set();
        sbi.allowed_terms = vec![10, 15, 30];
        let catalog = ProductCatalog::new(vec![
            Company::Hdfc.rule_set(),
            Company::Icici.rule_set(),
            sbi,
        ]);
        let config = QuoteConfig {
            as_of: Some(as_of()),
            ..QuoteConfig::default()
        };
        let engine = QuoteEngine::new(catalog, store(), config);

        let results = engine.quote(&request(None)).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|quote| quote.company_name != "SBI"));
    }

    #[test]
    fn test_fan_out_order_matches_sequential() {
        let req = request(Some("all"));
        let parallel = engine(true).quote(&req).unwrap();
        let sequential = engine(false).quote(&req).unwrap();
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.len(), 4);
    }

    #[test]
    fn test_fan_out_with_no_matches() {
        let mut req = request(None);
        req.term = 12;

        match engine(false).quote(&req) {
            Err(QuoteError::NoProductsMatch { failures }) => {
                assert_eq!(failures.len(), 4);
                assert!(failures.iter().all(|failure| !failure.errors.is_empty()));
            }
            other => panic!("expected no matches, got {:?}", other),
        }
    }

    #[test]
    fn test_sample_tables_quote_every_company() {
        let config = QuoteConfig {
            rate_table_dir: std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
                .join(crate::rates::DEFAULT_RATE_TABLE_PATH),
            as_of: Some(as_of()),
            parallel: true,
        };
        let engine = QuoteEngine::from_config(config).unwrap();

        let results = engine.quote(&request(None)).unwrap();
        let names: Vec<_> = results.iter().map(|q| q.company_name.as_str()).collect();
        assert_eq!(names, vec!["HDFC", "ICICI", "KOTAK", "SBI"]);

        let mut req = request(Some("HDFC"));
        req.riders.waiver_of_premium = true;
        let quote = engine.quote_company("HDFC", &req).unwrap().unwrap();
        assert!(quote.rider_premium > Decimal::ZERO);
    }

    #[test]
    fn test_malformed_rate_table_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let company_dir = dir.path().join("kotak");
        std::fs::create_dir_all(&company_dir).unwrap();
        std::fs::write(
            company_dir.join("kotak_rates.csv"),
            "Term,Gender,MinimumFaceAmount,MaximumFaceAmount,PolicyFee,HealthClass,Age,RatePerThousand\n\
             20,Male,100000,10000000,40,Preferred Non-Tob,35,abc\n",
        )
        .unwrap();

        let config = QuoteConfig {
            rate_table_dir: dir.path().to_path_buf(),
            as_of: Some(as_of()),
            parallel: false,
        };
        match QuoteEngine::from_config(config) {
            Err(QuoteError::RateTable(RateTableError::InvalidRow { path, line, message })) => {
                assert!(path.ends_with("kotak/kotak_rates.csv"));
                assert_eq!(line, 2);
                assert!(message.contains("RatePerThousand"));
            }
            Err(other) => panic!("expected a rate table error, got {:?}", other),
            Ok(_) => panic!("malformed table loaded"),
        }
    }

    #[test]
    fn test_empty_rate_directory_is_a_data_gap() {
        let dir = tempfile::tempdir().unwrap();
        let config = QuoteConfig {
            rate_table_dir: dir.path().to_path_buf(),
            as_of: Some(as_of()),
            parallel: false,
        };
        let engine = QuoteEngine::from_config(config).unwrap();

        // valid request, no tables: no quote and no error
        let results = engine.quote(&request(Some("KOTAK"))).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_fan_out_does_not_leak_company_selection() {
        let req = request(None);
        engine(false).quote_each(&req);
        assert!(req.company.is_none());
    }
}
