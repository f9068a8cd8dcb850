use crate::error::{ProcessingError, Result};
use crate::models::Metric;
use crate::utils::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_DATASET_FILE, DEFAULT_RANKING_LIMIT, ENV_PREFIX,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Run settings, layered as defaults, then config file, then `US_AQI_*` environment variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Settings {
    /// Bundled dataset used when no file is supplied
    pub dataset: PathBuf,

    /// Metric averaged per state
    pub state_metric: Metric,

    /// Pollutant driving the daily trend
    pub trend_pollutant: Metric,

    /// State names dropped in addition to "Country Of Mexico"
    pub excluded_states: Vec<String>,

    pub use_mmap: bool,

    /// States shown at each end of the ranking summary
    #[validate(range(min = 1, max = 51))]
    pub ranking_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from(DEFAULT_DATASET_FILE),
            state_metric: Metric::No2Aqi,
            trend_pollutant: Metric::No2Mean,
            excluded_states: Vec::new(),
            use_mmap: false,
            ranking_limit: DEFAULT_RANKING_LIMIT,
        }
    }
}

impl Settings {
    /// Load settings from `path` (or the default config file, if present) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Settings::default();

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .set_default("dataset", defaults.dataset.to_string_lossy().to_string())?
            .set_default("state_metric", defaults.state_metric.column_name())?
            .set_default("trend_pollutant", defaults.trend_pollutant.column_name())?
            .set_default("excluded_states", defaults.excluded_states.clone())?
            .set_default("use_mmap", defaults.use_mmap)?
            .set_default("ranking_limit", defaults.ranking_limit as u64)?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(";")
                    .with_list_parse_key("excluded_states"),
            )
            .build()?
            .try_deserialize()?;

        settings.check()?;
        Ok(settings)
    }

    /// Validate field ranges and the trend pollutant choice
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if !self.trend_pollutant.is_trend_pollutant() {
            return Err(ProcessingError::Config(format!(
                "trend pollutant must be one of {}, got '{}'",
                Metric::TREND_POLLUTANTS
                    .iter()
                    .map(|m| m.column_name())
                    .collect::<Vec<_>>()
                    .join(", "),
                self.trend_pollutant
            )));
        }

        Ok(())
    }
}
