//! Pricing Estimator
//!
//! Estimates monthly, annual and one-time CRM cost for a chosen edition,
//! add-ons, success plan and implementation package. Can also recommend a
//! configuration from a few questions about the sales team.

use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use eyre::Result;
use std::path::PathBuf;
use tracing::info;

mod commands;
mod config;
mod output;

use commands::{EstimateArgs, RecommendArgs};
use config::Config;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "pricing-estimator")]
#[command(about = "Estimate CRM license, add-on and success plan cost")]
struct Cli {
    /// Alternate pricing catalog (JSON). Overrides ESTIMATOR_CATALOG_PATH.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a configuration (starts from the default configuration)
    Estimate(EstimateArgs),

    /// Recommend a configuration from sales-team signals, then price it
    Recommend(RecommendArgs),

    /// List the editions, add-ons, success plans and packages in the catalog
    Catalog,
}

fn main() -> Result<()> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    let config = Config::from_env()?;
    let cli = Cli::parse();

    let catalog_path = cli.catalog.as_ref().or(config.catalog_path.as_ref());
    let catalog = commands::load_catalog(catalog_path)?;
    info!(
        editions = catalog.editions().len(),
        add_ons = catalog.add_ons().len(),
        "Pricing catalog loaded"
    );

    match cli.command {
        Commands::Estimate(args) => commands::estimate(catalog, args, cli.format, &config)?,
        Commands::Recommend(args) => commands::recommend(catalog, args, cli.format, &config)?,
        Commands::Catalog => commands::catalog(&catalog, cli.format)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_pricing::Level;

    #[test]
    fn test_parse_estimate_flags() {
        let cli = Cli::try_parse_from([
            "pricing-estimator",
            "estimate",
            "--seats",
            "25",
            "--edition",
            "unlimited",
            "--add-ons",
            "maps,salesPrograms",
            "--support",
            "premier",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Estimate(args) => {
                assert_eq!(args.seats.as_deref(), Some("25"));
                assert_eq!(args.edition.as_deref(), Some("unlimited"));
                assert_eq!(args.add_ons, vec!["maps", "salesPrograms"]);
                assert_eq!(args.support.as_deref(), Some("premier"));
                assert!(args.output.export.is_none());
            }
            _ => panic!("expected estimate"),
        }
    }

    #[test]
    fn test_parse_recommend_levels() {
        let cli = Cli::try_parse_from([
            "pricing-estimator",
            "--catalog",
            "team.json",
            "recommend",
            "--team-size",
            "8",
            "--budget",
            "high",
            "--quoting",
            "0",
            "--integrations",
            "false",
        ])
        .unwrap();

        assert_eq!(cli.catalog, Some(PathBuf::from("team.json")));
        match cli.command {
            Commands::Recommend(args) => {
                let signals = args.signals();
                assert_eq!(signals.team_size, 8);
                assert_eq!(signals.budget_sensitivity, Level::High);
                assert_eq!(signals.quoting_complexity, Level::None);
                assert!(!signals.need_integrations_api);
            }
            _ => panic!("expected recommend"),
        }
    }

    #[test]
    fn test_negative_counts_are_clamped() {
        let cli = Cli::try_parse_from([
            "pricing-estimator",
            "estimate",
            "--seats",
            "-5",
            "--prm-logins",
            "-3",
        ])
        .unwrap();
        let Commands::Estimate(args) = cli.command else {
            panic!("expected estimate");
        };
        assert_eq!(args.seats.as_deref(), Some("-5"));

        let catalog = std::sync::Arc::new(domain_pricing::Catalog::builtin());
        let (session, _) = commands::build_estimate_session(catalog, args).unwrap();
        assert_eq!(session.config().seats(), 1);
        assert_eq!(
            session.config().selection(domain_pricing::ids::PRM_LOGINS),
            Some(domain_pricing::AddOnSelection::Quantity(0))
        );
    }

    #[test]
    fn test_bare_export_flag() {
        let cli = Cli::try_parse_from(["pricing-estimator", "estimate", "--export"]).unwrap();
        match cli.command {
            Commands::Estimate(args) => {
                assert_eq!(args.output.export, Some(None));
            }
            _ => panic!("expected estimate"),
        }
    }

    #[test]
    fn test_rejects_unknown_level() {
        let result = Cli::try_parse_from(["pricing-estimator", "recommend", "--ai-priority", "max"]);
        assert!(result.is_err());
    }
}
