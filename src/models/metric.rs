use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProcessingError;

/// Numeric measurement columns of the pollution dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "NO2 Mean")]
    No2Mean,
    #[serde(rename = "O3 Mean")]
    O3Mean,
    #[serde(rename = "SO2 Mean")]
    So2Mean,
    #[serde(rename = "CO Mean")]
    CoMean,
    #[serde(rename = "NO2 AQI")]
    No2Aqi,
    #[serde(rename = "O3 AQI")]
    O3Aqi,
    #[serde(rename = "SO2 AQI")]
    So2Aqi,
    #[serde(rename = "CO AQI")]
    CoAqi,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::No2Mean,
        Metric::O3Mean,
        Metric::So2Mean,
        Metric::CoMean,
        Metric::No2Aqi,
        Metric::O3Aqi,
        Metric::So2Aqi,
        Metric::CoAqi,
    ];

    /// Pollutants selectable for the daily trend
    pub const TREND_POLLUTANTS: [Metric; 4] = [
        Metric::No2Mean,
        Metric::O3Mean,
        Metric::So2Mean,
        Metric::CoMean,
    ];

    /// Column header as it appears in the source CSV
    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::No2Mean => "NO2 Mean",
            Metric::O3Mean => "O3 Mean",
            Metric::So2Mean => "SO2 Mean",
            Metric::CoMean => "CO Mean",
            Metric::No2Aqi => "NO2 AQI",
            Metric::O3Aqi => "O3 AQI",
            Metric::So2Aqi => "SO2 AQI",
            Metric::CoAqi => "CO AQI",
        }
    }

    pub fn is_aqi(&self) -> bool {
        matches!(
            self,
            Metric::No2Aqi | Metric::O3Aqi | Metric::So2Aqi | Metric::CoAqi
        )
    }

    pub fn is_trend_pollutant(&self) -> bool {
        Self::TREND_POLLUTANTS.contains(self)
    }

    /// Parser for clap arguments
    pub fn parse_arg(s: &str) -> std::result::Result<Self, String> {
        s.parse().map_err(|e: ProcessingError| e.to_string())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Metric {
    type Err = ProcessingError;

    /// Accepts the column header ("NO2 Mean") or a short form ("no2", "no2-aqi")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        let metric = match normalized.as_str() {
            "no2 mean" | "no2" => Metric::No2Mean,
            "o3 mean" | "o3" => Metric::O3Mean,
            "so2 mean" | "so2" => Metric::So2Mean,
            "co mean" | "co" => Metric::CoMean,
            "no2 aqi" => Metric::No2Aqi,
            "o3 aqi" => Metric::O3Aqi,
            "so2 aqi" => Metric::So2Aqi,
            "co aqi" => Metric::CoAqi,
            _ => return Err(ProcessingError::InvalidMetric(s.to_string())),
        };
        Ok(metric)
    }
}
