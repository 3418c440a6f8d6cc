//! Pricing Domain
//!
//! Estimates CRM license cost from a static pricing catalog and a set of
//! user selections, and recommends a starting configuration from a few
//! qualitative signals about the sales team.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ EstimatorSession │  ← Edits, recompute, summary
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐   ┌─────────────┐
//! │  CostCalculator  │   │ Recommender │  ← Pure functions
//! └────────┬─────────┘   └──────┬──────┘
//!          │                    │
//! ┌────────▼────────────────────▼──────┐
//! │     Catalog  +  Configuration      │  ← Reference data, selections
//! └────────────────────────────────────┘
//! ```

pub mod calculator;
pub mod catalog;
pub mod chart;
pub mod configuration;
pub mod error;
pub mod models;
pub mod recommender;
pub mod session;
pub mod summary;

// Re-export commonly used types
pub use calculator::{CostCalculator, compute_cost};
pub use catalog::{
    AddOn, Catalog, CatalogKind, EditionPlan, ImplementationPackage, IncludedSupport,
    SupportPlan, ids,
};
pub use chart::{BreakdownChart, ChartSlice};
pub use configuration::Configuration;
pub use error::{PricingError, PricingResult};
pub use models::{AddOnSelection, AddOnUnit, CostBreakdown, Level, Prospect, Signals};
pub use recommender::{HeuristicRecommender, Recommendation, Recommender, recommend};
pub use session::EstimatorSession;
pub use summary::{export_summary, format_usd, personalized_line, render_summary};
