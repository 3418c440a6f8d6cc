//! Cost Calculator
//!
//! Derives the monthly, annual and one-time cost of a configuration from
//! the pricing catalog. Pure and deterministic: no rounding, no caching.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

use crate::PricingResult;
use crate::catalog::Catalog;
use crate::configuration::Configuration;
use crate::models::CostBreakdown;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Calculator bound to a single catalog
#[derive(Debug, Clone)]
pub struct CostCalculator {
    catalog: Arc<Catalog>,
}

impl CostCalculator {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn compute(&self, config: &Configuration) -> PricingResult<CostBreakdown> {
        compute_cost(config, &self.catalog)
    }
}

/// Compute the cost breakdown for a configuration.
///
/// Fails only with `UnknownCatalogKey` when the configuration references an
/// id the catalog does not have.
pub fn compute_cost(config: &Configuration, catalog: &Catalog) -> PricingResult<CostBreakdown> {
    let edition = catalog.edition(config.edition())?;
    let seats = config.seats();
    let license_monthly = Decimal::from(seats) * edition.price_per_seat;

    let mut add_ons_monthly = Decimal::ZERO;
    for (id, selection) in config.add_ons() {
        let add_on = catalog.add_on(id)?;
        // Selection is kept but not billed outside the gating edition
        if !add_on.applies_to(&edition.id) {
            continue;
        }
        add_ons_monthly += add_on.monthly_cost(seats, selection);
    }

    let plan = catalog.support_plan(config.support_plan())?;
    let included = catalog.is_support_included(&edition.id, &plan.id);
    let rate = if included {
        Decimal::ZERO
    } else {
        plan.rate.unwrap_or(Decimal::ZERO)
    };
    let support_monthly = (license_monthly + add_ons_monthly) * rate;

    let monthly_total = license_monthly + add_ons_monthly + support_monthly;
    let annual_total = monthly_total * Decimal::from(MONTHS_PER_YEAR);
    let one_time_fee = catalog.implementation(config.implementation())?.fee;

    debug!(
        edition = %edition.id,
        seats,
        support_plan = %plan.id,
        support_included = included,
        %monthly_total,
        %annual_total,
        "Computed cost breakdown"
    );

    Ok(CostBreakdown {
        license_monthly,
        add_ons_monthly,
        support_monthly,
        monthly_total,
        annual_total,
        one_time_fee,
        support_quote_required: !included && plan.rate.is_none(),
    })
}
