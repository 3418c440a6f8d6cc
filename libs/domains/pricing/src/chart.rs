use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::CostBreakdown;
use crate::summary::format_usd;

/// One segment of the monthly cost breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSlice {
    pub label: &'static str,
    /// Whole dollars
    pub amount: Decimal,
    /// Share of the monthly total in percent, one decimal place
    pub share: Decimal,
}

/// Licenses / add-ons / success plan split of the monthly total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownChart {
    pub slices: Vec<ChartSlice>,
}

impl BreakdownChart {
    pub fn from_breakdown(breakdown: &CostBreakdown) -> Self {
        let total = breakdown.monthly_total;
        let slice = |label, amount: Decimal| ChartSlice {
            label,
            amount: amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
            share: if total.is_zero() {
                Decimal::ZERO
            } else {
                (amount / total * Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
            },
        };

        Self {
            slices: vec![
                slice("Licenses", breakdown.license_monthly),
                slice("Add-ons", breakdown.add_ons_monthly),
                slice("Success Plan", breakdown.support_monthly),
            ],
        }
    }

    /// Render as horizontal text bars, `width` characters for a full 100%
    pub fn render_bars(&self, width: usize) -> String {
        let label_width = self
            .slices
            .iter()
            .map(|s| s.label.len())
            .max()
            .unwrap_or_default();

        self.slices
            .iter()
            .map(|s| {
                let filled = (s.share / Decimal::ONE_HUNDRED * Decimal::from(width))
                    .round()
                    .to_usize()
                    .unwrap_or_default()
                    .min(width);
                format!(
                    "{:<label_width$}  {}{}  {} ({}%)",
                    s.label,
                    "#".repeat(filled),
                    ".".repeat(width - filled),
                    format_usd(s.amount),
                    s.share,
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
