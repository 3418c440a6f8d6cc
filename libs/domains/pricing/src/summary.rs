//! Text rendering of an estimate.
//!
//! All rounding happens here; the calculator hands over exact figures.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::path::Path;
use tracing::{info, warn};

use crate::PricingResult;
use crate::catalog::Catalog;
use crate::configuration::Configuration;
use crate::models::{AddOnUnit, CostBreakdown, Prospect};

pub const DISCLAIMER: &str =
    "Disclaimer: Estimates only. Salesforce bills annually; taxes/discounts not included.";

/// Format an amount as whole US dollars, e.g. `$80,100`
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let whole = rounded.to_i128().unwrap_or_default();
    let digits = whole.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if whole < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Line shown above the figures while the user edits the form
pub fn personalized_line(prospect: &Prospect) -> String {
    let greeting = match prospect.first_name() {
        Some(name) => format!("Hey {name}"),
        None => "Hi there".to_string(),
    };
    format!(
        "{greeting}, here's a ballpark for {}. We'll email you a copy at {} if you hit copy.",
        prospect.company().unwrap_or("your company"),
        prospect.email().unwrap_or("(add email)"),
    )
}

/// Display names of every switched-on add-on, in catalog order. Per-login
/// add-ons carry their quantity.
///
/// Gated add-ons are listed even when the current edition does not bill them,
/// so the summary shows exactly what the user toggled.
pub fn active_add_on_names(config: &Configuration, catalog: &Catalog) -> Vec<String> {
    catalog
        .add_ons()
        .iter()
        .filter_map(|add_on| {
            let selection = config.selection(&add_on.id)?;
            if !selection.is_active() {
                return None;
            }
            Some(match add_on.unit {
                AddOnUnit::PerSeat => add_on.name.clone(),
                AddOnUnit::PerLogin => format!("{} x {}", add_on.name, selection.quantity()),
            })
        })
        .collect()
}

/// Shareable plain-text summary of a configuration and its cost
pub fn render_summary(
    prospect: &Prospect,
    config: &Configuration,
    catalog: &Catalog,
    breakdown: &CostBreakdown,
) -> PricingResult<String> {
    let edition = catalog.edition(config.edition())?;
    let plan = catalog.support_plan(config.support_plan())?;

    let add_ons = active_add_on_names(config, catalog);
    let add_ons = if add_ons.is_empty() {
        "None".to_string()
    } else {
        add_ons.join(", ")
    };

    let greeting = match prospect.first_name() {
        Some(name) => format!("{name}, Here's"),
        None => "Here's".to_string(),
    };

    let success = if breakdown.support_quote_required {
        format!("{} (quoted separately)", format_usd(breakdown.support_monthly))
    } else {
        format_usd(breakdown.support_monthly)
    };

    let lines = [
        format!(
            "{greeting} your Salesforce estimate for {}:",
            prospect.company().unwrap_or("your company")
        ),
        format!(
            "Edition: {} ({}/user/mo)",
            edition.name,
            format_usd(edition.price_per_seat)
        ),
        format!("Users: {}", config.seats()),
        format!("Add-ons: {add_ons}"),
        format!("Success Plan: {}", plan.name),
        String::new(),
        format!(
            "Monthly Total: {} (Licenses {} + Add-ons {} + Success {})",
            format_usd(breakdown.monthly_total),
            format_usd(breakdown.license_monthly),
            format_usd(breakdown.add_ons_monthly),
            success,
        ),
        format!("Annual Total: {}", format_usd(breakdown.annual_total)),
        format!(
            "One-time (Implementation): {}",
            format_usd(breakdown.one_time_fee)
        ),
        String::new(),
        DISCLAIMER.to_string(),
    ];

    Ok(lines.join("\n"))
}

/// Write a summary to disk. Best effort: a failure is logged and reported
/// through the return value, never as an error.
pub fn export_summary(path: impl AsRef<Path>, text: &str) -> bool {
    let path = path.as_ref();
    match std::fs::write(path, text) {
        Ok(()) => {
            info!(path = %path.display(), "Exported estimate summary");
            true
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not export estimate summary");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::compute_cost;
    use crate::catalog::ids;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(Decimal::ZERO), "$0");
        assert_eq!(format_usd(dec("175")), "$175");
        assert_eq!(format_usd(dec("6675")), "$6,675");
        assert_eq!(format_usd(dec("80100")), "$80,100");
        assert_eq!(format_usd(dec("1234567")), "$1,234,567");
        assert_eq!(format_usd(dec("2002.5")), "$2,003");
        assert_eq!(format_usd(dec("2002.49")), "$2,002");
        assert_eq!(format_usd(dec("-1500")), "-$1,500");
    }

    #[test]
    fn test_personalized_line_fallbacks() {
        assert_eq!(
            personalized_line(&Prospect::default()),
            "Hi there, here's a ballpark for your company. We'll email you a copy at (add email) if you hit copy."
        );

        let prospect = Prospect {
            first_name: Some("Ada".to_string()),
            company: Some("Acme".to_string()),
            email: Some("ada@acme.test".to_string()),
            ..Default::default()
        };
        assert_eq!(
            personalized_line(&prospect),
            "Hey Ada, here's a ballpark for Acme. We'll email you a copy at ada@acme.test if you hit copy."
        );
    }

    #[test]
    fn test_summary_for_default_configuration() {
        let catalog = Catalog::builtin();
        let config = Configuration::default();
        let breakdown = compute_cost(&config, &catalog).unwrap();
        let prospect = Prospect {
            first_name: Some("Ada".to_string()),
            company: Some("Acme".to_string()),
            ..Default::default()
        };

        let text = render_summary(&prospect, &config, &catalog, &breakdown).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Ada, Here's your Salesforce estimate for Acme:");
        assert_eq!(lines[1], "Edition: Enterprise ($175/user/mo)");
        assert_eq!(lines[2], "Users: 15");
        assert_eq!(lines[3], "Add-ons: Sales Engagement, Revenue Intelligence");
        assert_eq!(lines[4], "Success Plan: Standard (included)");
        assert_eq!(
            lines[6],
            "Monthly Total: $6,675 (Licenses $2,625 + Add-ons $4,050 + Success $0)"
        );
        assert_eq!(lines[7], "Annual Total: $80,100");
        assert_eq!(lines[8], "One-time (Implementation): $25,000");
        assert_eq!(lines.last().copied(), Some(DISCLAIMER));
    }

    #[test]
    fn test_summary_without_add_ons_says_none() {
        let catalog = Catalog::builtin();
        let config = Configuration::empty();
        let breakdown = compute_cost(&config, &catalog).unwrap();
        let text = render_summary(&Prospect::default(), &config, &catalog, &breakdown).unwrap();

        assert!(text.starts_with("Here's your Salesforce estimate for your company:"));
        assert!(text.contains("Add-ons: None"));
    }

    #[test]
    fn test_summary_lists_logins_and_gated_toggles() {
        let catalog = Catalog::builtin();
        let mut config = Configuration::empty();
        config
            .set_add_on_enabled(&catalog, ids::API_ADD_ON, true)
            .unwrap();
        config
            .set_add_on_quantity(&catalog, ids::PRM_LOGINS, 4)
            .unwrap();

        let expected = vec![
            "Web Services API (Pro Suite)".to_string(),
            "Partner Relationship Management x 4".to_string(),
        ];
        // Listed under Enterprise too, although only Pro Suite bills it
        assert_eq!(active_add_on_names(&config, &catalog), expected);
        let breakdown = compute_cost(&config, &catalog).unwrap();
        assert_eq!(breakdown.add_ons_monthly, dec("40"));

        config.set_edition(&catalog, ids::PRO).unwrap();
        assert_eq!(active_add_on_names(&config, &catalog), expected);
    }

    #[test]
    fn test_summary_marks_quoted_support() {
        let catalog = Catalog::builtin();
        let mut config = Configuration::default();
        config
            .set_support_plan(&catalog, ids::SUPPORT_SIGNATURE)
            .unwrap();
        let breakdown = compute_cost(&config, &catalog).unwrap();
        let text = render_summary(&Prospect::default(), &config, &catalog, &breakdown).unwrap();
        assert!(text.contains("Success $0 (quoted separately)"));
        assert!(text.contains("Success Plan: Signature (contact sales)"));
    }

    #[test]
    fn test_export_failure_is_not_fatal() {
        let dir = std::env::temp_dir().join("pricing-estimator-missing-dir-7c1f");
        let path = dir.join("nested").join("summary.txt");
        assert!(!export_summary(&path, "hello"));
    }

    #[test]
    fn test_export_writes_file() {
        let path = std::env::temp_dir().join(format!(
            "pricing-estimator-summary-{}.txt",
            std::process::id()
        ));
        assert!(export_summary(&path, "estimate"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "estimate");
        let _ = std::fs::remove_file(&path);
    }
}
