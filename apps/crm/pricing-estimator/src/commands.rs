//! Command handlers
//!
//! Each handler drives an `EstimatorSession` the way the estimator form
//! does: apply field edits one at a time, then recompute and render.

use clap::Args;
use domain_pricing::{
    Catalog, Configuration, EstimatorSession, Level, Prospect, Signals, export_summary,
};
use eyre::{Result, WrapErr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::output::{EstimateReport, OutputFormat, print_json, render_catalog};

#[derive(Debug, Default, Args)]
pub struct ProspectArgs {
    /// First name used in the greeting
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    /// Company named in the summary
    #[arg(long)]
    pub company: Option<String>,

    /// Email address to send the estimate to
    #[arg(long)]
    pub email: Option<String>,
}

impl ProspectArgs {
    fn into_prospect(self) -> Prospect {
        Prospect {
            first_name: self.first_name,
            last_name: self.last_name,
            company: self.company,
            email: self.email,
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct OutputArgs {
    /// Write the plain-text summary to a file (best effort). Without a path,
    /// ESTIMATOR_EXPORT_PATH is used.
    #[arg(long)]
    pub export: Option<Option<PathBuf>>,

    /// Print the licenses / add-ons / success breakdown as a bar chart
    #[arg(long)]
    pub chart: bool,
}

#[derive(Debug, Default, Args)]
pub struct EstimateArgs {
    /// Start from a configuration document (JSON) instead of the defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of licensed users (values below 1 count as 1)
    #[arg(short, long, allow_negative_numbers = true)]
    pub seats: Option<String>,

    /// Edition id (starter, pro, enterprise, unlimited, agentforce1)
    #[arg(short, long)]
    pub edition: Option<String>,

    /// Per-seat add-ons to switch on
    #[arg(short, long, value_delimiter = ',')]
    pub add_ons: Vec<String>,

    /// Per-seat add-ons to switch off
    #[arg(long, value_delimiter = ',')]
    pub without: Vec<String>,

    /// Partner Relationship Management logins (negative counts as 0)
    #[arg(long, allow_negative_numbers = true)]
    pub prm_logins: Option<String>,

    /// Success plan id (standard, premier, signature)
    #[arg(long)]
    pub support: Option<String>,

    /// Implementation package id (none, basic, standard, advanced)
    #[arg(short, long)]
    pub implementation: Option<String>,

    #[command(flatten)]
    pub prospect: ProspectArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Default, Args)]
pub struct RecommendArgs {
    /// Number of sellers on the team
    #[arg(long)]
    pub team_size: Option<u32>,

    /// Quoting complexity: none, low, high (or 0-2)
    #[arg(long)]
    pub quoting: Option<Level>,

    /// Forecasting maturity: none, low, high (or 0-2)
    #[arg(long)]
    pub forecasting: Option<Level>,

    /// Number of field reps working territories
    #[arg(long)]
    pub field_sales: Option<u32>,

    /// Outbound prospecting cadence: none, low, high (or 0-2)
    #[arg(long)]
    pub outbound: Option<Level>,

    /// Whether integrations or API access are needed
    #[arg(long)]
    pub integrations: Option<bool>,

    /// Priority of AI features: none, low, high (or 0-2)
    #[arg(long)]
    pub ai_priority: Option<Level>,

    /// Budget sensitivity: none, low, high (or 0-2)
    #[arg(long)]
    pub budget: Option<Level>,

    #[command(flatten)]
    pub prospect: ProspectArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl RecommendArgs {
    /// Overlay the given flags on the form's default signals
    pub fn signals(&self) -> Signals {
        let defaults = Signals::default();
        Signals {
            team_size: self.team_size.unwrap_or(defaults.team_size),
            quoting_complexity: self.quoting.unwrap_or(defaults.quoting_complexity),
            forecasting_maturity: self.forecasting.unwrap_or(defaults.forecasting_maturity),
            field_sales: self.field_sales.unwrap_or(defaults.field_sales),
            outbound_cadence: self.outbound.unwrap_or(defaults.outbound_cadence),
            need_integrations_api: self.integrations.unwrap_or(defaults.need_integrations_api),
            ai_priority: self.ai_priority.unwrap_or(defaults.ai_priority),
            budget_sensitivity: self.budget.unwrap_or(defaults.budget_sensitivity),
        }
    }
}

/// Load the catalog from a file if one is configured, otherwise the built-in one
pub fn load_catalog(path: Option<&PathBuf>) -> Result<Arc<Catalog>> {
    let catalog = match path {
        Some(path) => {
            info!(path = %path.display(), "Using alternate pricing catalog");
            Catalog::from_path(path)
                .wrap_err_with(|| format!("Failed to load catalog {}", path.display()))?
        }
        None => Catalog::builtin(),
    };
    Ok(Arc::new(catalog))
}

pub fn build_estimate_session(
    catalog: Arc<Catalog>,
    args: EstimateArgs,
) -> Result<(EstimatorSession, OutputArgs)> {
    let config = match &args.config {
        Some(path) => Configuration::from_path(path, &catalog)
            .wrap_err_with(|| format!("Failed to load configuration {}", path.display()))?,
        None => Configuration::default(),
    };
    let mut session = EstimatorSession::with_configuration(catalog, config)?;

    if let Some(seats) = &args.seats {
        session.set_seats_input(seats)?;
    }
    if let Some(edition) = &args.edition {
        session.set_edition(edition)?;
    }
    for add_on in &args.add_ons {
        session.set_add_on_enabled(add_on, true)?;
    }
    for add_on in &args.without {
        session.set_add_on_enabled(add_on, false)?;
    }
    if let Some(logins) = &args.prm_logins {
        session.set_add_on_quantity_input(domain_pricing::ids::PRM_LOGINS, logins)?;
    }
    if let Some(plan) = &args.support {
        session.set_support_plan(plan)?;
    }
    if let Some(package) = &args.implementation {
        session.set_implementation(package)?;
    }
    session.set_prospect(args.prospect.into_prospect())?;

    Ok((session, args.output))
}

pub fn build_recommend_session(
    catalog: Arc<Catalog>,
    args: RecommendArgs,
) -> Result<(EstimatorSession, &'static str, OutputArgs)> {
    let mut session = EstimatorSession::new(catalog)?;
    session.set_signals(args.signals());
    session.set_prospect(args.prospect.into_prospect())?;
    let rule = session.apply_recommendation()?;
    Ok((session, rule, args.output))
}

pub fn estimate(
    catalog: Arc<Catalog>,
    args: EstimateArgs,
    format: OutputFormat,
    config: &Config,
) -> Result<()> {
    let (session, output) = build_estimate_session(catalog, args)?;
    present(&session, None, &output, format, config)
}

pub fn recommend(
    catalog: Arc<Catalog>,
    args: RecommendArgs,
    format: OutputFormat,
    config: &Config,
) -> Result<()> {
    let (session, rule, output) = build_recommend_session(catalog, args)?;
    present(&session, Some(rule), &output, format, config)
}

pub fn catalog(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(catalog),
        OutputFormat::Text => {
            print!("{}", render_catalog(catalog));
            Ok(())
        }
    }
}

fn present(
    session: &EstimatorSession,
    rule: Option<&'static str>,
    output: &OutputArgs,
    format: OutputFormat,
    config: &Config,
) -> Result<()> {
    let breakdown = session.estimate()?;
    let chart = session.chart()?;
    let summary = session.summary()?;

    match format {
        OutputFormat::Json => print_json(&EstimateReport {
            rule,
            configuration: session.config(),
            breakdown: &breakdown,
            chart: &chart,
            summary: &summary,
        })?,
        OutputFormat::Text => {
            if let Some(rule) = rule {
                println!("Recommended by rule: {rule}\n");
            }
            println!("{}", domain_pricing::personalized_line(session.prospect()));
            println!();
            println!("{summary}");
            if output.chart {
                println!();
                println!("{}", chart.render_bars(config.chart_width));
            }
        }
    }

    if let Some(path) = export_target(output, config) {
        // Export never changes the outcome of the command
        export_summary(&path, &summary);
    }

    Ok(())
}

fn export_target(output: &OutputArgs, config: &Config) -> Option<PathBuf> {
    if let Some(requested) = output.export.as_ref()? {
        return Some(requested.clone());
    }
    let fallback = config.export_path.clone();
    if fallback.is_none() {
        warn!("--export given without a path and ESTIMATOR_EXPORT_PATH is unset; skipping export");
    }
    fallback
}
