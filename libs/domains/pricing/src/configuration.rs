//! User selections for a single estimate.
//!
//! Every field edit goes through a setter that validates against the catalog
//! and clamps numeric input, so a `Configuration` handed to the calculator
//! always has at least one seat and non-negative quantities.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::catalog::{Catalog, ids};
use crate::error::{PricingError, PricingResult};
use crate::models::{AddOnSelection, AddOnUnit};

pub const MIN_SEATS: u32 = 1;
pub const DEFAULT_SEATS: u32 = 15;

/// Current selections: edition, seats, add-ons, support and implementation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawConfiguration")]
pub struct Configuration {
    seats: u32,
    edition: String,
    add_ons: BTreeMap<String, AddOnSelection>,
    support_plan: String,
    implementation: String,
}

impl Default for Configuration {
    fn default() -> Self {
        let add_ons = [
            (ids::API_ADD_ON, AddOnSelection::Enabled(false)),
            (ids::SALES_ENGAGEMENT, AddOnSelection::Enabled(true)),
            (ids::CONVERSATION_INTELLIGENCE, AddOnSelection::Enabled(false)),
            (ids::REVENUE_INTELLIGENCE, AddOnSelection::Enabled(true)),
            (ids::REVENUE_CLOUD, AddOnSelection::Enabled(false)),
            (ids::MAPS, AddOnSelection::Enabled(false)),
            (ids::SALES_PROGRAMS, AddOnSelection::Enabled(false)),
            (ids::EMAILS_ALERTS, AddOnSelection::Enabled(false)),
            (ids::PRM_LOGINS, AddOnSelection::Quantity(0)),
        ]
        .into_iter()
        .map(|(id, selection)| (id.to_string(), selection))
        .collect();

        Self {
            seats: DEFAULT_SEATS,
            edition: ids::ENTERPRISE.to_string(),
            add_ons,
            support_plan: ids::SUPPORT_STANDARD.to_string(),
            implementation: ids::IMPL_STANDARD.to_string(),
        }
    }
}

impl Configuration {
    /// Startup configuration with no add-ons selected
    pub fn empty() -> Self {
        Self {
            add_ons: BTreeMap::new(),
            ..Self::default()
        }
    }

    /// Parse a configuration document and check it against the catalog
    pub fn from_json_str(json: &str, catalog: &Catalog) -> PricingResult<Self> {
        let config: Configuration = serde_json::from_str(json)?;
        config.validate(catalog)?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>, catalog: &Catalog) -> PricingResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration");
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json, catalog)
    }

    pub fn seats(&self) -> u32 {
        self.seats
    }

    pub fn edition(&self) -> &str {
        &self.edition
    }

    pub fn support_plan(&self) -> &str {
        &self.support_plan
    }

    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    /// All recorded add-on selections, active or not, ordered by id
    pub fn add_ons(&self) -> impl Iterator<Item = (&str, AddOnSelection)> {
        self.add_ons.iter().map(|(id, sel)| (id.as_str(), *sel))
    }

    pub fn selection(&self, add_on_id: &str) -> Option<AddOnSelection> {
        self.add_ons.get(add_on_id).copied()
    }

    /// Set the seat count, clamping anything below one up to one
    pub fn set_seats(&mut self, seats: i64) {
        self.seats = clamp_to_u32(seats, MIN_SEATS);
    }

    /// Set the seat count from raw text input. Blank input means one seat.
    pub fn set_seats_input(&mut self, input: &str) -> PricingResult<()> {
        let seats = parse_whole_number("seats", input)?.unwrap_or(MIN_SEATS.into());
        self.set_seats(seats);
        Ok(())
    }

    pub fn set_edition(&mut self, catalog: &Catalog, edition_id: &str) -> PricingResult<()> {
        let edition = catalog.edition(edition_id)?;
        self.edition = edition.id.clone();
        Ok(())
    }

    pub fn set_support_plan(&mut self, catalog: &Catalog, plan_id: &str) -> PricingResult<()> {
        let plan = catalog.support_plan(plan_id)?;
        self.support_plan = plan.id.clone();
        Ok(())
    }

    pub fn set_implementation(&mut self, catalog: &Catalog, package_id: &str) -> PricingResult<()> {
        let package = catalog.implementation(package_id)?;
        self.implementation = package.id.clone();
        Ok(())
    }

    /// Toggle a per-seat add-on.
    ///
    /// The toggle is stored even when the add-on is gated to another edition;
    /// the calculator ignores it until that edition is selected.
    pub fn set_add_on_enabled(
        &mut self,
        catalog: &Catalog,
        add_on_id: &str,
        enabled: bool,
    ) -> PricingResult<()> {
        let add_on = catalog.add_on(add_on_id)?;
        if add_on.unit != AddOnUnit::PerSeat {
            return Err(PricingError::invalid_field(
                add_on_id,
                format!("{} is billed {} and takes a quantity", add_on.name, add_on.unit),
            ));
        }
        self.add_ons
            .insert(add_on.id.clone(), AddOnSelection::Enabled(enabled));
        Ok(())
    }

    /// Set the quantity of a per-login add-on, clamping negatives to zero
    pub fn set_add_on_quantity(
        &mut self,
        catalog: &Catalog,
        add_on_id: &str,
        quantity: i64,
    ) -> PricingResult<()> {
        let add_on = catalog.add_on(add_on_id)?;
        if add_on.unit != AddOnUnit::PerLogin {
            return Err(PricingError::invalid_field(
                add_on_id,
                format!("{} is billed {} and can only be toggled", add_on.name, add_on.unit),
            ));
        }
        self.add_ons.insert(
            add_on.id.clone(),
            AddOnSelection::Quantity(clamp_to_u32(quantity, 0)),
        );
        Ok(())
    }

    /// Set a per-login quantity from raw text input. Blank input means zero.
    pub fn set_add_on_quantity_input(
        &mut self,
        catalog: &Catalog,
        add_on_id: &str,
        input: &str,
    ) -> PricingResult<()> {
        let quantity = parse_whole_number(add_on_id, input)?.unwrap_or(0);
        self.set_add_on_quantity(catalog, add_on_id, quantity)
    }

    /// Check that every referenced id exists and each selection matches the
    /// add-on's billing unit.
    pub fn validate(&self, catalog: &Catalog) -> PricingResult<()> {
        catalog.edition(&self.edition)?;
        catalog.support_plan(&self.support_plan)?;
        catalog.implementation(&self.implementation)?;

        for (id, selection) in &self.add_ons {
            let add_on = catalog.add_on(id)?;
            let matches_unit = matches!(
                (add_on.unit, selection),
                (AddOnUnit::PerSeat, AddOnSelection::Enabled(_))
                    | (AddOnUnit::PerLogin, AddOnSelection::Quantity(_))
            );
            if !matches_unit {
                return Err(PricingError::invalid_field(
                    id.as_str(),
                    format!("selection does not match {} billing", add_on.unit),
                ));
            }
        }

        Ok(())
    }
}

fn clamp_to_u32(value: i64, min: u32) -> u32 {
    u32::try_from(value.max(i64::from(min))).unwrap_or(u32::MAX)
}

fn parse_whole_number(field: &str, input: &str) -> PricingResult<Option<i64>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse::<i64>().map(Some).map_err(|_| {
        PricingError::invalid_field(field, format!("expected a whole number, got '{trimmed}'"))
    })
}

/// Wire form of a configuration document. Numeric fields are signed so
/// out-of-range input is clamped rather than rejected.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfiguration {
    #[serde(default = "default_raw_seats")]
    seats: i64,
    edition: String,
    #[serde(default)]
    add_ons: BTreeMap<String, RawSelection>,
    support_plan: String,
    implementation: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSelection {
    Enabled(bool),
    Quantity(i64),
}

fn default_raw_seats() -> i64 {
    DEFAULT_SEATS.into()
}

impl From<RawConfiguration> for Configuration {
    fn from(raw: RawConfiguration) -> Self {
        let add_ons = raw
            .add_ons
            .into_iter()
            .map(|(id, sel)| {
                let sel = match sel {
                    RawSelection::Enabled(on) => AddOnSelection::Enabled(on),
                    RawSelection::Quantity(q) => AddOnSelection::Quantity(clamp_to_u32(q, 0)),
                };
                (id, sel)
            })
            .collect();

        Self {
            seats: clamp_to_u32(raw.seats, MIN_SEATS),
            edition: raw.edition,
            add_ons,
            support_plan: raw.support_plan,
            implementation: raw.implementation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogKind;

    #[test]
    fn test_default_configuration_is_valid() {
        let catalog = Catalog::builtin();
        let config = Configuration::default();
        assert!(config.validate(&catalog).is_ok());
        assert_eq!(config.seats(), 15);
        assert_eq!(config.edition(), ids::ENTERPRISE);
        assert_eq!(
            config.selection(ids::SALES_ENGAGEMENT),
            Some(AddOnSelection::Enabled(true))
        );
        assert_eq!(
            config.selection(ids::PRM_LOGINS),
            Some(AddOnSelection::Quantity(0))
        );
    }

    #[test]
    fn test_seats_clamp_to_one() {
        let mut config = Configuration::default();
        config.set_seats(0);
        assert_eq!(config.seats(), 1);
        config.set_seats(-25);
        assert_eq!(config.seats(), 1);
        config.set_seats(42);
        assert_eq!(config.seats(), 42);
    }

    #[test]
    fn test_seats_input_parsing() {
        let mut config = Configuration::default();
        config.set_seats_input(" 30 ").unwrap();
        assert_eq!(config.seats(), 30);

        config.set_seats_input("").unwrap();
        assert_eq!(config.seats(), 1);

        config.set_seats_input("-3").unwrap();
        assert_eq!(config.seats(), 1);

        let err = config.set_seats_input("lots").unwrap_err();
        assert!(matches!(err, PricingError::InvalidFieldValue { ref field, .. } if field == "seats"));
        assert_eq!(config.seats(), 1);
    }

    #[test]
    fn test_unknown_ids_rejected_and_state_kept() {
        let catalog = Catalog::builtin();
        let mut config = Configuration::default();

        let err = config.set_edition(&catalog, "platinum").unwrap_err();
        assert!(matches!(
            err,
            PricingError::UnknownCatalogKey { kind: CatalogKind::Edition, .. }
        ));
        assert_eq!(config.edition(), ids::ENTERPRISE);

        assert!(config.set_support_plan(&catalog, "gold").is_err());
        assert!(config.set_implementation(&catalog, "bespoke").is_err());
        assert!(config.set_add_on_enabled(&catalog, "fax", true).is_err());
    }

    #[test]
    fn test_quantity_clamps_to_zero() {
        let catalog = Catalog::builtin();
        let mut config = Configuration::default();
        config
            .set_add_on_quantity(&catalog, ids::PRM_LOGINS, -5)
            .unwrap();
        assert_eq!(
            config.selection(ids::PRM_LOGINS),
            Some(AddOnSelection::Quantity(0))
        );

        config
            .set_add_on_quantity_input(&catalog, ids::PRM_LOGINS, "12")
            .unwrap();
        assert_eq!(
            config.selection(ids::PRM_LOGINS),
            Some(AddOnSelection::Quantity(12))
        );

        assert!(config
            .set_add_on_quantity_input(&catalog, ids::PRM_LOGINS, "twelve")
            .is_err());
    }

    #[test]
    fn test_selection_kind_must_match_unit() {
        let catalog = Catalog::builtin();
        let mut config = Configuration::default();
        assert!(matches!(
            config.set_add_on_enabled(&catalog, ids::PRM_LOGINS, true),
            Err(PricingError::InvalidFieldValue { .. })
        ));
        assert!(matches!(
            config.set_add_on_quantity(&catalog, ids::MAPS, 3),
            Err(PricingError::InvalidFieldValue { .. })
        ));
    }

    #[test]
    fn test_from_json_clamps_and_validates() {
        let catalog = Catalog::builtin();
        let json = r#"{
            "seats": 0,
            "edition": "pro",
            "addOns": {"apiAddOn": true, "prmLogins": -2},
            "supportPlan": "premier",
            "implementation": "none"
        }"#;
        let config = Configuration::from_json_str(json, &catalog).unwrap();
        assert_eq!(config.seats(), 1);
        assert_eq!(config.edition(), ids::PRO);
        assert_eq!(
            config.selection(ids::PRM_LOGINS),
            Some(AddOnSelection::Quantity(0))
        );
    }

    #[test]
    fn test_from_json_unknown_edition() {
        let catalog = Catalog::builtin();
        let json = r#"{"edition": "gold", "supportPlan": "standard", "implementation": "none"}"#;
        assert!(matches!(
            Configuration::from_json_str(json, &catalog),
            Err(PricingError::UnknownCatalogKey { .. })
        ));
    }

    #[test]
    fn test_from_json_mismatched_selection() {
        let catalog = Catalog::builtin();
        let json = r#"{
            "edition": "pro",
            "addOns": {"maps": 3},
            "supportPlan": "standard",
            "implementation": "none"
        }"#;
        assert!(matches!(
            Configuration::from_json_str(json, &catalog),
            Err(PricingError::InvalidFieldValue { .. })
        ));
    }
}
