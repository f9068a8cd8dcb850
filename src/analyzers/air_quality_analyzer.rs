use crate::error::Result;
use crate::models::{DailyTrend, Extrema, Metric, Observation, StateAggregate, StateTable};
use crate::processors::{
    aggregate_by_date, aggregate_by_state, find_extrema, rank_states, CleaningReport, DataCleaner,
};
use crate::readers::DatasetSource;
use crate::settings::Settings;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

/// Everything the presentation layer consumes from one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct AirQualityReport {
    pub source: Option<DatasetSource>,
    pub cleaning: CleaningReport,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub state_table: StateTable,
    pub extrema: Extrema,
    /// Extrema over real postal codes only, absent when no known state has a value
    pub known_extrema: Option<Extrema>,
    pub trend: DailyTrend,
    pub ranking: Vec<StateAggregate>,
}

/// Runs load-and-clean, both aggregations, extrema and ranking in one pass
pub struct AirQualityAnalyzer {
    state_metric: Metric,
    trend_pollutant: Metric,
    cleaner: DataCleaner,
}

impl AirQualityAnalyzer {
    pub fn new() -> Self {
        Self {
            state_metric: Metric::No2Aqi,
            trend_pollutant: Metric::No2Mean,
            cleaner: DataCleaner::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new()
            .with_state_metric(settings.state_metric)
            .with_trend_pollutant(settings.trend_pollutant)
            .with_excluded_states(settings.excluded_states.clone())
    }

    pub fn with_state_metric(mut self, metric: Metric) -> Self {
        self.state_metric = metric;
        self
    }

    pub fn with_trend_pollutant(mut self, pollutant: Metric) -> Self {
        self.trend_pollutant = pollutant;
        self
    }

    pub fn with_excluded_states(mut self, excluded_states: Vec<String>) -> Self {
        self.cleaner = self.cleaner.with_excluded_states(excluded_states);
        self
    }

    /// Metric columns this analyzer reads
    pub fn required_metrics(&self) -> [Metric; 2] {
        [self.state_metric, self.trend_pollutant]
    }

    /// Clean the rows and compute only the daily trend for the configured pollutant
    pub fn trend(&self, observations: Vec<Observation>) -> Result<DailyTrend> {
        let cleaned = self.cleaner.clean(observations)?;
        let trend = aggregate_by_date(&cleaned.observations, self.trend_pollutant);
        info!(days = trend.len(), pollutant = %self.trend_pollutant, "trend computed");
        Ok(trend)
    }

    pub fn analyze(
        &self,
        observations: Vec<Observation>,
        source: Option<DatasetSource>,
    ) -> Result<AirQualityReport> {
        let cleaned = self.cleaner.clean(observations)?;
        let rows = &cleaned.observations;

        let trend = aggregate_by_date(rows, self.trend_pollutant);
        let state_table = aggregate_by_state(rows, self.state_metric);
        let extrema = find_extrema(&state_table)?;
        let known_extrema = find_extrema(&state_table.known_states()).ok();
        let ranking = rank_states(&state_table)?;

        let date_range = rows
            .iter()
            .map(|r| r.date)
            .min()
            .zip(rows.iter().map(|r| r.date).max());

        info!(
            states = state_table.len(),
            days = trend.len(),
            most_polluted = %extrema.max.state,
            least_polluted = %extrema.min.state,
            "analysis complete"
        );

        Ok(AirQualityReport {
            source,
            cleaning: cleaned.report,
            date_range,
            state_table,
            extrema,
            known_extrema,
            trend,
            ranking,
        })
    }
}

impl Default for AirQualityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn format_mean(mean: Option<f64>) -> String {
    mean.map_or_else(|| "n/a".to_string(), |m| format!("{:.2}", m))
}

impl AirQualityReport {
    /// State table restricted to real postal codes
    pub fn known_states(&self) -> StateTable {
        self.state_table.known_states()
    }

    /// Extrema named in the summary: known states when any have a value, else the full table
    pub fn headline_extrema(&self) -> &Extrema {
        self.known_extrema.as_ref().unwrap_or(&self.extrema)
    }

    pub fn summary(&self) -> String {
        let headline = self.headline_extrema();
        let source = self
            .source
            .as_ref()
            .map_or_else(|| "in-memory rows".to_string(), |s| s.to_string());

        let date_range = match self.date_range {
            Some((first, last)) => format!("{} to {}", first, last),
            None => "n/a".to_string(),
        };

        format!(
            "Source: {}\n\
            Records: {} retained ({} excluded, {} with unmapped state)\n\
            Date Range: {}\n\
            States: {}\n\
            Worst air quality: {} (average {}: {})\n\
            Best air quality: {} (average {}: {})",
            source,
            self.cleaning.retained_rows,
            self.cleaning.excluded_rows,
            self.cleaning.unmapped_rows,
            date_range,
            self.state_table.len(),
            headline.max.state,
            self.state_table.metric,
            format_mean(headline.max.mean),
            headline.min.state,
            self.state_table.metric,
            format_mean(headline.min.mean),
        )
    }

    pub fn detailed_summary(&self, limit: usize) -> String {
        let mut summary = self.summary();

        summary.push_str(&format!("\n\nHighest average {}:\n", self.state_table.metric));
        for (i, entry) in self.ranking.iter().take(limit).enumerate() {
            summary.push_str(&format!(
                "  {}. {} {}\n",
                i + 1,
                entry.state,
                format_mean(entry.mean)
            ));
        }

        let shown_top = limit.min(self.ranking.len());
        let bottom_start = self.ranking.len().saturating_sub(limit).max(shown_top);
        if bottom_start < self.ranking.len() {
            summary.push_str(&format!("\nLowest average {}:\n", self.state_table.metric));
            for (i, entry) in self.ranking.iter().enumerate().skip(bottom_start) {
                summary.push_str(&format!(
                    "  {}. {} {}\n",
                    i + 1,
                    entry.state,
                    format_mean(entry.mean)
                ));
            }
        }

        summary.push_str(&format!(
            "\n{} daily trend: {} days",
            self.trend.metric,
            self.trend.len()
        ));
        if let Some(peak) = self.trend.peak() {
            summary.push_str(&format!(
                ", peak {} on {}",
                format_mean(peak.mean),
                peak.date
            ));
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use pretty_assertions::assert_eq;

    fn obs(state: &str, day: u32, aqi: f64, no2: f64) -> Observation {
        Observation::new(state, NaiveDate::from_ymd_opt(2015, 1, day).unwrap())
            .with_value(Metric::No2Aqi, Some(aqi))
            .with_value(Metric::No2Mean, Some(no2))
    }

    #[test]
    fn test_full_pipeline() -> Result<()> {
        let rows = vec![
            obs("California", 1, 10.0, 4.0),
            obs("California", 2, 20.0, 6.0),
            obs("Texas", 1, 5.0, 2.0),
            obs("Country Of Mexico", 1, 80.0, 40.0),
        ];

        let report = AirQualityAnalyzer::new().analyze(rows, None)?;

        assert_eq!(report.cleaning.excluded_rows, 1);
        assert_eq!(report.extrema.max.state.as_str(), "CA");
        assert_eq!(report.extrema.max.mean, Some(15.0));
        assert_eq!(report.extrema.min.state.as_str(), "TX");
        let ranked: Vec<&str> = report.ranking.iter().map(|e| e.state.as_str()).collect();
        assert_eq!(ranked, vec!["CA", "TX"]);
        assert_eq!(report.trend.points.len(), 2);
        assert_eq!(report.trend.points[0].mean, Some(3.0));
        assert_eq!(
            report.date_range.map(|(_, last)| last),
            NaiveDate::from_ymd_opt(2015, 1, 2)
        );

        let summary = report.summary();
        assert!(summary.contains("Worst air quality: CA (average NO2 AQI: 15.00)"));
        assert!(summary.contains("Best air quality: TX (average NO2 AQI: 5.00)"));
        Ok(())
    }

    #[test]
    fn test_only_excluded_rows_is_empty_dataset() {
        let rows = vec![obs("Country Of Mexico", 1, 80.0, 40.0)];
        let err = AirQualityAnalyzer::new().analyze(rows, None).unwrap_err();
        assert!(matches!(err, ProcessingError::EmptyDataset(_)));
    }

    #[test]
    fn test_known_states_drop_unknown_bucket() -> Result<()> {
        let rows = vec![obs("Texas", 1, 5.0, 2.0), obs("Atlantis", 1, 50.0, 9.0)];
        let report = AirQualityAnalyzer::new().analyze(rows, None)?;

        assert_eq!(report.state_table.len(), 2);
        assert_eq!(report.extrema.max.state.as_str(), "UNKNOWN");
        assert_eq!(report.known_states().len(), 1);

        let known = report.known_extrema.as_ref().unwrap();
        assert_eq!(known.max.state.as_str(), "TX");
        let summary = report.summary();
        assert!(summary.contains("Worst air quality: TX (average NO2 AQI: 5.00)"));
        assert!(!summary.contains("UNKNOWN"));
        Ok(())
    }

    #[test]
    fn test_summary_falls_back_when_only_unknown_states() -> Result<()> {
        let rows = vec![obs("Atlantis", 1, 50.0, 9.0)];
        let report = AirQualityAnalyzer::new().analyze(rows, None)?;

        assert!(report.known_extrema.is_none());
        assert!(report
            .summary()
            .contains("Worst air quality: UNKNOWN (average NO2 AQI: 50.00)"));
        Ok(())
    }

    #[test]
    fn test_trend_does_not_need_state_metric() -> Result<()> {
        let day = |d| NaiveDate::from_ymd_opt(2015, 1, d).unwrap();
        let rows = vec![
            Observation::new("Texas", day(2)).with_value(Metric::No2Mean, Some(8.0)),
            Observation::new("Ohio", day(1)).with_value(Metric::No2Mean, Some(3.0)),
            Observation::new("Ohio", day(2)).with_value(Metric::No2Mean, Some(4.0)),
        ];
        let analyzer = AirQualityAnalyzer::new();

        let err = analyzer.analyze(rows.clone(), None).unwrap_err();
        assert!(matches!(err, ProcessingError::EmptyDataset(_)));

        let trend = analyzer.trend(rows)?;
        assert_eq!(trend.metric, Metric::No2Mean);
        let points: Vec<_> = trend.points.iter().map(|p| (p.date, p.mean)).collect();
        assert_eq!(points, vec![(day(1), Some(3.0)), (day(2), Some(6.0))]);
        Ok(())
    }

    #[test]
    fn test_detailed_summary_lists_both_ends() -> Result<()> {
        let states = ["Ohio", "Utah", "Iowa", "Maine", "Texas", "Idaho"];
        let rows = states
            .iter()
            .enumerate()
            .map(|(i, s)| obs(s, 1, (i + 1) as f64 * 10.0, 1.0))
            .collect();

        let report = AirQualityAnalyzer::new().analyze(rows, None)?;
        let detailed = report.detailed_summary(2);

        assert!(detailed.contains("  1. ID 60.00"));
        assert!(detailed.contains("  6. OH 10.00"));
        assert!(!detailed.contains("  3. "));
        assert!(detailed.contains("NO2 Mean daily trend: 1 days"));
        Ok(())
    }
}
