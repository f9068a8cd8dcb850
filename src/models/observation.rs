use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Metric, StateCode, StateKey};

/// One row of the pollution dataset.
///
/// `state_abbr` is `None` until the cleaner annotates the row, and stays
/// `None` for names without a postal code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub state: String,
    pub date: NaiveDate,
    pub no2_mean: Option<f64>,
    pub o3_mean: Option<f64>,
    pub so2_mean: Option<f64>,
    pub co_mean: Option<f64>,
    pub no2_aqi: Option<f64>,
    pub o3_aqi: Option<f64>,
    pub so2_aqi: Option<f64>,
    pub co_aqi: Option<f64>,
    pub state_abbr: Option<StateCode>,
}

impl Observation {
    /// Create an observation with no measurements; use `with_value` to fill them in
    pub fn new(state: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            state: state.into(),
            date,
            no2_mean: None,
            o3_mean: None,
            so2_mean: None,
            co_mean: None,
            no2_aqi: None,
            o3_aqi: None,
            so2_aqi: None,
            co_aqi: None,
            state_abbr: None,
        }
    }

    pub fn with_value(mut self, metric: Metric, value: Option<f64>) -> Self {
        self.set_value(metric, value);
        self
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::No2Mean => self.no2_mean,
            Metric::O3Mean => self.o3_mean,
            Metric::So2Mean => self.so2_mean,
            Metric::CoMean => self.co_mean,
            Metric::No2Aqi => self.no2_aqi,
            Metric::O3Aqi => self.o3_aqi,
            Metric::So2Aqi => self.so2_aqi,
            Metric::CoAqi => self.co_aqi,
        }
    }

    /// Non-finite values are stored as missing
    pub fn set_value(&mut self, metric: Metric, value: Option<f64>) {
        let value = value.filter(|v| v.is_finite());
        let slot = match metric {
            Metric::No2Mean => &mut self.no2_mean,
            Metric::O3Mean => &mut self.o3_mean,
            Metric::So2Mean => &mut self.so2_mean,
            Metric::CoMean => &mut self.co_mean,
            Metric::No2Aqi => &mut self.no2_aqi,
            Metric::O3Aqi => &mut self.o3_aqi,
            Metric::So2Aqi => &mut self.so2_aqi,
            Metric::CoAqi => &mut self.co_aqi,
        };
        *slot = value;
    }

    pub fn state_key(&self) -> StateKey {
        self.state_abbr.into()
    }
}
