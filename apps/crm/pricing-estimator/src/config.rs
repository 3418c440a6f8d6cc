//! Configuration for the pricing estimator

use core_config::{ConfigError, Environment, FromEnv, env_optional, env_parse_or};
use std::path::PathBuf;

pub const DEFAULT_CHART_WIDTH: usize = 40;

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    /// Alternate pricing catalog (JSON). The built-in catalog is used if unset.
    pub catalog_path: Option<PathBuf>,
    /// Where `--export` writes when no path is given on the command line
    pub export_path: Option<PathBuf>,
    /// Width of the text breakdown chart
    pub chart_width: usize,
}

impl FromEnv for Config {
    /// Reads:
    /// - APP_ENV: "production" for JSON logs (default: development)
    /// - ESTIMATOR_CATALOG_PATH: optional catalog file
    /// - ESTIMATOR_EXPORT_PATH: optional default export file
    /// - ESTIMATOR_CHART_WIDTH: defaults to 40
    fn from_env() -> Result<Self, ConfigError> {
        let chart_width = env_parse_or("ESTIMATOR_CHART_WIDTH", DEFAULT_CHART_WIDTH)?;
        if chart_width == 0 {
            return Err(ConfigError::ParseError {
                key: "ESTIMATOR_CHART_WIDTH".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            environment: Environment::from_env(),
            catalog_path: env_optional("ESTIMATOR_CATALOG_PATH").map(PathBuf::from),
            export_path: env_optional("ESTIMATOR_EXPORT_PATH").map(PathBuf::from),
            chart_width,
        })
    }
}
