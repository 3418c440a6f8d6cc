use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use crate::calculator::CostCalculator;
use crate::catalog::Catalog;
use crate::chart::BreakdownChart;
use crate::configuration::Configuration;
use crate::error::{PricingError, PricingResult};
use crate::models::{CostBreakdown, Prospect, Signals};
use crate::recommender::{HeuristicRecommender, Recommender};
use crate::summary;

/// One interactive estimating session.
///
/// Holds the current selections, signals and prospect details. Every read of
/// the estimate recomputes from scratch, so edits can be applied in any order
/// and as often as needed.
pub struct EstimatorSession {
    calculator: CostCalculator,
    recommender: Box<dyn Recommender>,
    config: Configuration,
    signals: Signals,
    prospect: Prospect,
}

impl EstimatorSession {
    /// Start a session with the default configuration
    pub fn new(catalog: Arc<Catalog>) -> PricingResult<Self> {
        Self::with_configuration(catalog, Configuration::default())
    }

    pub fn with_configuration(catalog: Arc<Catalog>, config: Configuration) -> PricingResult<Self> {
        config.validate(&catalog)?;
        Ok(Self {
            calculator: CostCalculator::new(catalog),
            recommender: Box::new(HeuristicRecommender::new()),
            config,
            signals: Signals::default(),
            prospect: Prospect::default(),
        })
    }

    pub fn with_recommender(mut self, recommender: Box<dyn Recommender>) -> Self {
        self.recommender = recommender;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        self.calculator.catalog()
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn signals(&self) -> &Signals {
        &self.signals
    }

    pub fn prospect(&self) -> &Prospect {
        &self.prospect
    }

    pub fn set_seats_input(&mut self, input: &str) -> PricingResult<()> {
        self.config.set_seats_input(input)
    }

    pub fn set_seats(&mut self, seats: i64) {
        self.config.set_seats(seats);
    }

    pub fn set_edition(&mut self, edition_id: &str) -> PricingResult<()> {
        self.config.set_edition(self.calculator.catalog(), edition_id)
    }

    pub fn set_support_plan(&mut self, plan_id: &str) -> PricingResult<()> {
        self.config
            .set_support_plan(self.calculator.catalog(), plan_id)
    }

    pub fn set_implementation(&mut self, package_id: &str) -> PricingResult<()> {
        self.config
            .set_implementation(self.calculator.catalog(), package_id)
    }

    pub fn set_add_on_enabled(&mut self, add_on_id: &str, enabled: bool) -> PricingResult<()> {
        self.config
            .set_add_on_enabled(self.calculator.catalog(), add_on_id, enabled)
    }

    pub fn set_add_on_quantity_input(&mut self, add_on_id: &str, input: &str) -> PricingResult<()> {
        self.config
            .set_add_on_quantity_input(self.calculator.catalog(), add_on_id, input)
    }

    /// Signals only feed the recommender; they never change the estimate
    /// until a recommendation is applied.
    pub fn set_signals(&mut self, signals: Signals) {
        self.signals = signals;
    }

    pub fn set_prospect(&mut self, prospect: Prospect) -> PricingResult<()> {
        prospect
            .validate()
            .map_err(|e| PricingError::invalid_field("email", e.to_string()))?;
        self.prospect = prospect;
        Ok(())
    }

    /// Replace the configuration with one recommended from the current
    /// signals. Returns the name of the edition rule that fired.
    pub fn apply_recommendation(&mut self) -> PricingResult<&'static str> {
        let recommendation = self
            .recommender
            .recommend(&self.signals, self.calculator.catalog())?;
        info!(
            rule = recommendation.rule,
            edition = recommendation.config.edition(),
            "Applied recommendation"
        );
        self.config = recommendation.config;
        Ok(recommendation.rule)
    }

    pub fn estimate(&self) -> PricingResult<CostBreakdown> {
        let breakdown = self.calculator.compute(&self.config)?;
        debug!(monthly_total = %breakdown.monthly_total, "Recomputed estimate");
        Ok(breakdown)
    }

    /// Plain-text summary of the current estimate
    pub fn summary(&self) -> PricingResult<String> {
        let breakdown = self.estimate()?;
        summary::render_summary(
            &self.prospect,
            &self.config,
            self.calculator.catalog(),
            &breakdown,
        )
    }

    pub fn chart(&self) -> PricingResult<BreakdownChart> {
        Ok(BreakdownChart::from_breakdown(&self.estimate()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ids;
    use crate::models::Level;
    use rust_decimal::Decimal;

    fn session() -> EstimatorSession {
        EstimatorSession::new(Arc::new(Catalog::builtin())).unwrap()
    }

    #[test]
    fn test_default_session_estimate() {
        let out = session().estimate().unwrap();
        assert_eq!(out.monthly_total, Decimal::from(6675));
        assert_eq!(out.one_time_fee, Decimal::from(25_000));
    }

    #[test]
    fn test_edits_recompute() {
        let mut session = session();
        session.set_seats_input("1").unwrap();
        session.set_edition(ids::STARTER).unwrap();
        session
            .set_add_on_enabled(ids::SALES_ENGAGEMENT, false)
            .unwrap();
        session
            .set_add_on_enabled(ids::REVENUE_INTELLIGENCE, false)
            .unwrap();
        session.set_implementation(ids::IMPL_NONE).unwrap();

        let out = session.estimate().unwrap();
        assert_eq!(out.monthly_total, Decimal::from(25));
        assert_eq!(out.one_time_fee, Decimal::ZERO);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let session = session();
        let a = session.estimate().unwrap();
        let b = session.estimate().unwrap();
        let _ = session.summary().unwrap();
        assert_eq!(a, session.estimate().unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn test_failed_edit_leaves_estimate_unchanged() {
        let mut session = session();
        let before = session.estimate().unwrap();
        assert!(session.set_edition("platinum").is_err());
        assert!(session.set_seats_input("many").is_err());
        assert_eq!(session.estimate().unwrap(), before);
    }

    #[test]
    fn test_signals_do_not_affect_estimate_until_applied() {
        let mut session = session();
        let before = session.estimate().unwrap();
        session.set_signals(Signals {
            ai_priority: Level::High,
            team_size: 40,
            ..Signals::default()
        });
        assert_eq!(session.estimate().unwrap(), before);

        let rule = session.apply_recommendation().unwrap();
        assert_eq!(rule, "ai-priority-large-team");
        assert_eq!(session.config().edition(), ids::AGENTFORCE_1);
        assert_eq!(session.config().seats(), 40);
        assert_ne!(session.estimate().unwrap(), before);
    }

    #[test]
    fn test_invalid_prospect_email_rejected() {
        let mut session = session();
        let result = session.set_prospect(Prospect {
            email: Some("nope".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(PricingError::InvalidFieldValue { .. })));
        assert_eq!(session.prospect(), &Prospect::default());
    }

    #[test]
    fn test_invalid_starting_configuration() {
        let catalog = Arc::new(Catalog::builtin());
        let mut config = Configuration::default();
        config.set_seats(3);
        let json = serde_json::to_string(&config)
            .unwrap()
            .replace("enterprise", "platinum");
        let bad: Configuration = serde_json::from_str(&json).unwrap();
        assert!(EstimatorSession::with_configuration(catalog, bad).is_err());
    }
}
