//! Output formatting

use clap::ValueEnum;
use domain_pricing::{BreakdownChart, Catalog, Configuration, CostBreakdown, format_usd};
use eyre::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Everything an estimate command prints in JSON mode
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<&'static str>,
    pub configuration: &'a Configuration,
    pub breakdown: &'a CostBreakdown,
    pub chart: &'a BreakdownChart,
    pub summary: &'a str,
}

pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Plain listing of every catalog entry
pub fn render_catalog(catalog: &Catalog) -> String {
    let mut out = String::from("Editions:\n");
    for edition in catalog.editions() {
        out.push_str(&format!(
            "  {:<14} {:<28} {}/user/mo\n",
            edition.id,
            edition.name,
            format_usd(edition.price_per_seat)
        ));
    }

    out.push_str("\nAdd-ons:\n");
    for add_on in catalog.add_ons() {
        let gate = add_on
            .edition_gate
            .as_deref()
            .map(|g| format!(" [{g} only]"))
            .unwrap_or_default();
        out.push_str(&format!(
            "  {:<26} {:<34} {}/{}{}\n",
            add_on.id,
            add_on.name,
            format_usd(add_on.price_per_unit),
            add_on.unit,
            gate
        ));
    }

    out.push_str("\nSuccess plans:\n");
    for plan in catalog.support_plans() {
        let rate = plan
            .rate_percent()
            .map(|pct| format!("{pct}%"))
            .unwrap_or_else(|| "quote".to_string());
        out.push_str(&format!("  {:<14} {:<28} {}\n", plan.id, plan.name, rate));
    }

    out.push_str("\nImplementation packages:\n");
    for package in catalog.implementations() {
        out.push_str(&format!(
            "  {:<14} {:<28} {}\n",
            package.id,
            package.name,
            format_usd(package.fee)
        ));
    }

    if let Some(included) = catalog.included_support() {
        out.push_str(&format!(
            "\n{} includes the {} success plan at no extra cost.\n",
            included.edition, included.support_plan
        ));
    }

    out
}
