//! Recommendation Engine
//!
//! Turns qualitative signals about a sales team into a full replacement
//! configuration. The edition is chosen by an ordered rule table (first match
//! wins), and each add-on is set by its own independent rule.

use tracing::debug;

use crate::PricingResult;
use crate::catalog::{Catalog, ids};
use crate::configuration::Configuration;
use crate::models::{Level, Signals};

/// Trait for recommendation providers
pub trait Recommender {
    fn recommend(&self, signals: &Signals, catalog: &Catalog) -> PricingResult<Recommendation>;
}

/// A recommended configuration and the edition rule that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub rule: &'static str,
    pub config: Configuration,
}

/// One row of the edition decision table
#[derive(Debug, Clone, Copy)]
pub struct EditionRule {
    pub name: &'static str,
    pub matches: fn(&Signals) -> bool,
    pub edition: &'static str,
}

/// Decides whether a single add-on is switched on, given the signals and the
/// edition already resolved.
#[derive(Debug, Clone, Copy)]
pub struct AddOnRule {
    pub add_on: &'static str,
    pub enabled: fn(&Signals, &str) -> bool,
}

/// Rule-table recommender (no external service)
#[derive(Debug, Clone)]
pub struct HeuristicRecommender {
    edition_rules: Vec<EditionRule>,
    fallback: EditionRule,
    add_on_rules: Vec<AddOnRule>,
}

impl Default for HeuristicRecommender {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicRecommender {
    pub fn new() -> Self {
        let edition_rules = vec![
            EditionRule {
                name: "ai-priority-large-team",
                matches: |s| s.ai_priority == Level::High && s.team_size >= 25,
                edition: ids::AGENTFORCE_1,
            },
            EditionRule {
                name: "complex-quoting-or-integrations",
                matches: |s| s.quoting_complexity == Level::High || s.need_integrations_api,
                edition: ids::ENTERPRISE,
            },
            EditionRule {
                name: "small-budget-team",
                matches: |s| s.team_size <= 10 && s.budget_sensitivity == Level::High,
                edition: ids::STARTER,
            },
            EditionRule {
                name: "mid-size-cost-aware",
                matches: |s| s.team_size <= 20 && s.budget_sensitivity >= Level::Low,
                edition: ids::PRO,
            },
        ];

        let fallback = EditionRule {
            name: "default-enterprise",
            matches: |_| true,
            edition: ids::ENTERPRISE,
        };

        let add_on_rules = vec![
            AddOnRule {
                add_on: ids::SALES_ENGAGEMENT,
                enabled: |s, _| s.outbound_cadence >= Level::Low,
            },
            AddOnRule {
                add_on: ids::CONVERSATION_INTELLIGENCE,
                enabled: |s, _| s.outbound_cadence == Level::High,
            },
            AddOnRule {
                add_on: ids::REVENUE_INTELLIGENCE,
                enabled: |s, _| s.forecasting_maturity >= Level::Low,
            },
            AddOnRule {
                add_on: ids::REVENUE_CLOUD,
                enabled: |s, _| s.quoting_complexity == Level::High,
            },
            AddOnRule {
                add_on: ids::MAPS,
                enabled: |s, _| s.field_sales >= 1,
            },
            AddOnRule {
                add_on: ids::SALES_PROGRAMS,
                enabled: |s, _| s.outbound_cadence >= Level::Low && s.team_size >= 15,
            },
            AddOnRule {
                add_on: ids::EMAILS_ALERTS,
                enabled: |_, _| false,
            },
            // Only meaningful on Pro Suite
            AddOnRule {
                add_on: ids::API_ADD_ON,
                enabled: |s, edition| edition == ids::PRO && s.need_integrations_api,
            },
        ];

        Self {
            edition_rules,
            fallback,
            add_on_rules,
        }
    }

    /// Build a recommender from custom tables
    pub fn with_rules(
        edition_rules: Vec<EditionRule>,
        fallback: EditionRule,
        add_on_rules: Vec<AddOnRule>,
    ) -> Self {
        Self {
            edition_rules,
            fallback,
            add_on_rules,
        }
    }

    pub fn edition_rules(&self) -> &[EditionRule] {
        &self.edition_rules
    }

    /// First matching edition rule, or the fallback
    pub fn resolve_edition(&self, signals: &Signals) -> &EditionRule {
        self.edition_rules
            .iter()
            .find(|rule| (rule.matches)(signals))
            .unwrap_or(&self.fallback)
    }
}

impl Recommender for HeuristicRecommender {
    fn recommend(&self, signals: &Signals, catalog: &Catalog) -> PricingResult<Recommendation> {
        let rule = self.resolve_edition(signals);

        let mut config = Configuration::empty();
        config.set_edition(catalog, rule.edition)?;
        config.set_seats(signals.team_size.into());

        for add_on_rule in &self.add_on_rules {
            let enabled = (add_on_rule.enabled)(signals, rule.edition);
            config.set_add_on_enabled(catalog, add_on_rule.add_on, enabled)?;
        }
        config.set_add_on_quantity(catalog, ids::PRM_LOGINS, 0)?;
        config.set_support_plan(catalog, ids::SUPPORT_STANDARD)?;
        config.set_implementation(catalog, ids::IMPL_STANDARD)?;

        debug!(
            rule = rule.name,
            edition = rule.edition,
            seats = config.seats(),
            "Resolved recommendation"
        );

        Ok(Recommendation {
            rule: rule.name,
            config,
        })
    }
}

/// Recommend a configuration with the default rule tables
pub fn recommend(signals: &Signals, catalog: &Catalog) -> PricingResult<Configuration> {
    HeuristicRecommender::new()
        .recommend(signals, catalog)
        .map(|r| r.config)
}
