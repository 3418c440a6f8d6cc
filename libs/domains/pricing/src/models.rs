use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

/// Three-step qualitative level used by the recommendation signals.
///
/// Ordered, so rules can ask for "at least low". Parses from the level name
/// or from the 0/1/2 slider value used by the estimator form.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Level {
    #[default]
    #[strum(to_string = "none", serialize = "0")]
    None,
    #[strum(to_string = "low", serialize = "1")]
    Low,
    #[strum(to_string = "high", serialize = "2")]
    High,
}

/// How an add-on is billed
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AddOnUnit {
    /// Charged for every licensed seat
    #[default]
    PerSeat,
    /// Charged per purchased login, independent of seats
    PerLogin,
}

/// Selection state of a single add-on within a configuration.
///
/// Per-seat add-ons are toggled, per-login add-ons carry a quantity. In JSON
/// the two forms are a bare boolean or a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AddOnSelection {
    Enabled(bool),
    Quantity(u32),
}

impl AddOnSelection {
    /// Number of billable units this selection stands for.
    ///
    /// A toggle counts as a single unit when on.
    pub fn quantity(&self) -> u32 {
        match self {
            AddOnSelection::Enabled(true) => 1,
            AddOnSelection::Enabled(false) => 0,
            AddOnSelection::Quantity(q) => *q,
        }
    }

    pub fn is_active(&self) -> bool {
        self.quantity() > 0
    }
}

/// Qualitative business context that drives the recommendation engine.
///
/// Never read by the cost calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Signals {
    pub team_size: u32,
    pub quoting_complexity: Level,
    pub forecasting_maturity: Level,
    /// Number of field reps working territories
    pub field_sales: u32,
    pub outbound_cadence: Level,
    pub need_integrations_api: bool,
    pub ai_priority: Level,
    pub budget_sensitivity: Level,
}

impl Default for Signals {
    fn default() -> Self {
        Self {
            team_size: 15,
            quoting_complexity: Level::High,
            forecasting_maturity: Level::Low,
            field_sales: 0,
            outbound_cadence: Level::Low,
            need_integrations_api: true,
            ai_priority: Level::Low,
            budget_sensitivity: Level::Low,
        }
    }
}

/// Contact details used to personalize the estimate text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Prospect {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

impl Prospect {
    pub fn first_name(&self) -> Option<&str> {
        non_blank(self.first_name.as_deref())
    }

    pub fn company(&self) -> Option<&str> {
        non_blank(self.company.as_deref())
    }

    pub fn email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Monthly and annual cost derived from a configuration.
///
/// All figures are exact; rounding happens only when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub license_monthly: Decimal,
    pub add_ons_monthly: Decimal,
    pub support_monthly: Decimal,
    pub monthly_total: Decimal,
    pub annual_total: Decimal,
    pub one_time_fee: Decimal,
    /// The selected support plan has no list rate and must be quoted by sales
    pub support_quote_required: bool,
}
