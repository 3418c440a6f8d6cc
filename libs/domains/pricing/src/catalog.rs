//! Pricing Catalog
//!
//! Read-only reference data for editions, add-ons, support plans and
//! implementation packages. The built-in catalog carries the list prices the
//! estimator ships with; alternate catalogs can be loaded from JSON and are
//! validated before use.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use strum::Display;
use tracing::debug;

use crate::error::{PricingError, PricingResult};
use crate::models::{AddOnSelection, AddOnUnit};

/// Well-known catalog ids referenced by the default configuration and the
/// recommendation rules.
pub mod ids {
    pub const STARTER: &str = "starter";
    pub const PRO: &str = "pro";
    pub const ENTERPRISE: &str = "enterprise";
    pub const UNLIMITED: &str = "unlimited";
    pub const AGENTFORCE_1: &str = "agentforce1";

    pub const API_ADD_ON: &str = "apiAddOn";
    pub const SALES_ENGAGEMENT: &str = "salesEngagement";
    pub const CONVERSATION_INTELLIGENCE: &str = "conversationIntelligence";
    pub const REVENUE_INTELLIGENCE: &str = "revenueIntelligence";
    pub const REVENUE_CLOUD: &str = "revenueCloud";
    pub const MAPS: &str = "maps";
    pub const SALES_PROGRAMS: &str = "salesPrograms";
    pub const EMAILS_ALERTS: &str = "emailsAlerts";
    pub const PRM_LOGINS: &str = "prmLogins";

    pub const SUPPORT_STANDARD: &str = "standard";
    pub const SUPPORT_PREMIER: &str = "premier";
    pub const SUPPORT_SIGNATURE: &str = "signature";

    pub const IMPL_NONE: &str = "none";
    pub const IMPL_BASIC: &str = "basic";
    pub const IMPL_STANDARD: &str = "standard";
    pub const IMPL_ADVANCED: &str = "advanced";
}

/// Largest accepted price or fee (10^12).
///
/// Keeps `u32::MAX` seats times any price, plus support, times twelve months
/// well inside `Decimal` range.
pub const MAX_LIST_PRICE: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Kind of catalog entry, used when reporting unknown ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum CatalogKind {
    #[strum(to_string = "edition")]
    Edition,
    #[strum(to_string = "add-on")]
    AddOn,
    #[strum(to_string = "support plan")]
    SupportPlan,
    #[strum(to_string = "implementation package")]
    Implementation,
}

/// Base product tier, priced per seat per month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditionPlan {
    pub id: String,
    pub name: String,
    pub price_per_seat: Decimal,
}

/// Optional priced feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOn {
    pub id: String,
    pub name: String,
    pub price_per_unit: Decimal,
    pub unit: AddOnUnit,
    /// Edition this add-on is restricted to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition_gate: Option<String>,
}

impl AddOn {
    /// Whether the add-on is billable under the given edition
    pub fn applies_to(&self, edition_id: &str) -> bool {
        self.edition_gate
            .as_deref()
            .is_none_or(|gate| gate == edition_id)
    }

    /// Monthly charge for a selection of this add-on
    pub fn monthly_cost(&self, seats: u32, selection: AddOnSelection) -> Decimal {
        let units = match self.unit {
            AddOnUnit::PerSeat if selection.is_active() => seats,
            AddOnUnit::PerSeat => 0,
            AddOnUnit::PerLogin => selection.quantity(),
        };
        Decimal::from(units) * self.price_per_unit
    }
}

/// Post-sale success plan, priced as a fraction of license + add-on spend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportPlan {
    pub id: String,
    pub name: String,
    /// `None` when the plan is only available through a manual quote
    pub rate: Option<Decimal>,
}

impl SupportPlan {
    /// Rate as a percentage, e.g. `30` for a 0.3 rate
    pub fn rate_percent(&self) -> Option<Decimal> {
        self.rate.map(|r| (r * Decimal::ONE_HUNDRED).normalize())
    }
}

/// One-time professional services package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationPackage {
    pub id: String,
    pub name: String,
    pub fee: Decimal,
}

/// The one edition and support plan pair where the plan is already part of
/// the edition and costs nothing extra.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludedSupport {
    pub edition: String,
    pub support_plan: String,
}

/// Immutable pricing catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    editions: Vec<EditionPlan>,
    add_ons: Vec<AddOn>,
    support_plans: Vec<SupportPlan>,
    implementations: Vec<ImplementationPackage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    included_support: Option<IncludedSupport>,
}

impl Catalog {
    /// Build a catalog from its parts, checking every invariant
    pub fn new(
        editions: Vec<EditionPlan>,
        add_ons: Vec<AddOn>,
        support_plans: Vec<SupportPlan>,
        implementations: Vec<ImplementationPackage>,
        included_support: Option<IncludedSupport>,
    ) -> PricingResult<Self> {
        let catalog = Self {
            editions,
            add_ons,
            support_plans,
            implementations,
            included_support,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The list prices the estimator ships with (USD)
    pub fn builtin() -> Self {
        let edition = |id: &str, name: &str, price: i64| EditionPlan {
            id: id.to_string(),
            name: name.to_string(),
            price_per_seat: Decimal::from(price),
        };
        let per_seat = |id: &str, name: &str, price: i64| AddOn {
            id: id.to_string(),
            name: name.to_string(),
            price_per_unit: Decimal::from(price),
            unit: AddOnUnit::PerSeat,
            edition_gate: None,
        };
        let support = |id: &str, name: &str, rate: Option<Decimal>| SupportPlan {
            id: id.to_string(),
            name: name.to_string(),
            rate,
        };
        let package = |id: &str, name: &str, fee: i64| ImplementationPackage {
            id: id.to_string(),
            name: name.to_string(),
            fee: Decimal::from(fee),
        };

        Self {
            editions: vec![
                edition(ids::STARTER, "Starter Suite", 25),
                edition(ids::PRO, "Pro Suite", 100),
                edition(ids::ENTERPRISE, "Enterprise", 175),
                edition(ids::UNLIMITED, "Unlimited", 350),
                edition(ids::AGENTFORCE_1, "Agentforce 1 Sales", 550),
            ],
            add_ons: vec![
                AddOn {
                    edition_gate: Some(ids::PRO.to_string()),
                    ..per_seat(ids::API_ADD_ON, "Web Services API (Pro Suite)", 25)
                },
                per_seat(ids::SALES_ENGAGEMENT, "Sales Engagement", 50),
                per_seat(
                    ids::CONVERSATION_INTELLIGENCE,
                    "Einstein Conversation Insights",
                    50,
                ),
                per_seat(ids::REVENUE_INTELLIGENCE, "Revenue Intelligence", 220),
                per_seat(ids::REVENUE_CLOUD, "Revenue Cloud (CPQ/Billing)", 200),
                per_seat(ids::MAPS, "Salesforce Maps", 75),
                per_seat(ids::SALES_PROGRAMS, "Sales Programs", 100),
                per_seat(ids::EMAILS_ALERTS, "Sales Emails & Alerts", 50),
                AddOn {
                    unit: AddOnUnit::PerLogin,
                    ..per_seat(ids::PRM_LOGINS, "Partner Relationship Management", 10)
                },
            ],
            support_plans: vec![
                support(ids::SUPPORT_STANDARD, "Standard (included)", Some(Decimal::ZERO)),
                support(
                    ids::SUPPORT_PREMIER,
                    "Premier (+30% of license)",
                    Some(Decimal::new(3, 1)),
                ),
                support(ids::SUPPORT_SIGNATURE, "Signature (contact sales)", None),
            ],
            implementations: vec![
                package(ids::IMPL_NONE, "No Implementation Package", 0),
                package(ids::IMPL_BASIC, "Quick Start (CRM Hacker)", 10_000),
                package(ids::IMPL_STANDARD, "Standard (CRM Hacker)", 25_000),
                package(ids::IMPL_ADVANCED, "Advanced (CRM Hacker)", 50_000),
            ],
            // Unlimited already bundles Premier success
            included_support: Some(IncludedSupport {
                edition: ids::UNLIMITED.to_string(),
                support_plan: ids::SUPPORT_PREMIER.to_string(),
            }),
        }
    }

    /// Parse and validate a catalog from JSON
    pub fn from_json_str(json: &str) -> PricingResult<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a catalog file
    pub fn from_path(path: impl AsRef<Path>) -> PricingResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading pricing catalog");
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn edition(&self, id: &str) -> PricingResult<&EditionPlan> {
        self.editions
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| PricingError::unknown_key(CatalogKind::Edition, id))
    }

    pub fn add_on(&self, id: &str) -> PricingResult<&AddOn> {
        self.add_ons
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| PricingError::unknown_key(CatalogKind::AddOn, id))
    }

    pub fn support_plan(&self, id: &str) -> PricingResult<&SupportPlan> {
        self.support_plans
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| PricingError::unknown_key(CatalogKind::SupportPlan, id))
    }

    pub fn implementation(&self, id: &str) -> PricingResult<&ImplementationPackage> {
        self.implementations
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| PricingError::unknown_key(CatalogKind::Implementation, id))
    }

    pub fn editions(&self) -> &[EditionPlan] {
        &self.editions
    }

    pub fn add_ons(&self) -> &[AddOn] {
        &self.add_ons
    }

    pub fn support_plans(&self) -> &[SupportPlan] {
        &self.support_plans
    }

    pub fn implementations(&self) -> &[ImplementationPackage] {
        &self.implementations
    }

    pub fn included_support(&self) -> Option<&IncludedSupport> {
        self.included_support.as_ref()
    }

    /// True only for the catalog's single bundled edition/plan pair
    pub fn is_support_included(&self, edition_id: &str, support_plan_id: &str) -> bool {
        self.included_support
            .as_ref()
            .is_some_and(|inc| inc.edition == edition_id && inc.support_plan == support_plan_id)
    }

    fn validate(&self) -> PricingResult<()> {
        if self.editions.is_empty() {
            return Err(PricingError::InvalidCatalog(
                "at least one edition is required".to_string(),
            ));
        }

        check_unique("edition", self.editions.iter().map(|e| e.id.as_str()))?;
        check_unique("add-on", self.add_ons.iter().map(|a| a.id.as_str()))?;
        check_unique(
            "support plan",
            self.support_plans.iter().map(|s| s.id.as_str()),
        )?;
        check_unique(
            "implementation package",
            self.implementations.iter().map(|i| i.id.as_str()),
        )?;

        for edition in &self.editions {
            check_price(&edition.id, edition.price_per_seat)?;
        }

        for add_on in &self.add_ons {
            check_price(&add_on.id, add_on.price_per_unit)?;
            if let Some(gate) = &add_on.edition_gate {
                self.edition(gate).map_err(|_| {
                    PricingError::InvalidCatalog(format!(
                        "add-on '{}' is gated to unknown edition '{}'",
                        add_on.id, gate
                    ))
                })?;
            }
        }

        for plan in &self.support_plans {
            if let Some(rate) = plan.rate {
                if rate < Decimal::ZERO || rate > Decimal::ONE {
                    return Err(PricingError::InvalidCatalog(format!(
                        "support plan '{}' has rate {} outside [0, 1]",
                        plan.id, rate
                    )));
                }
            }
        }

        for package in &self.implementations {
            check_price(&package.id, package.fee)?;
        }

        if let Some(included) = &self.included_support {
            if self.edition(&included.edition).is_err()
                || self.support_plan(&included.support_plan).is_err()
            {
                return Err(PricingError::InvalidCatalog(format!(
                    "included support pair ({}, {}) references unknown ids",
                    included.edition, included.support_plan
                )));
            }
        }

        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> PricingResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(PricingError::InvalidCatalog(format!(
                "duplicate {kind} id '{id}'"
            )));
        }
    }
    Ok(())
}

fn check_price(id: &str, amount: Decimal) -> PricingResult<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PricingError::InvalidCatalog(format!(
            "'{id}' has negative price {amount}"
        )));
    }
    if amount > MAX_LIST_PRICE {
        return Err(PricingError::InvalidCatalog(format!(
            "'{id}' has price {amount} above the {MAX_LIST_PRICE} ceiling"
        )));
    }
    Ok(())
}
