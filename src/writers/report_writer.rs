use crate::analyzers::AirQualityReport;
use crate::error::Result;
use crate::models::{DailyTrend, StateAggregate, StateTable};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Exports derived tables for external renderers
pub struct ReportWriter {
    decimals: usize,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self { decimals: 4 }
    }

    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    /// Write the whole report as pretty-printed JSON
    pub fn write_json(&self, report: &AirQualityReport, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(create_file(path)?);
        serde_json::to_writer_pretty(&mut writer, report)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        info!(path = %path.display(), "wrote JSON report");
        Ok(())
    }

    /// Columns: State Abbr, <metric>, Records, Samples
    pub fn write_state_table(&self, table: &StateTable, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_writer(create_file(path)?);
        writer.write_record(["State Abbr", table.metric.column_name(), "Records", "Samples"])?;

        for entry in table.iter() {
            writer.write_record([
                entry.state.to_string(),
                self.format_value(entry.mean),
                entry.records.to_string(),
                entry.samples.to_string(),
            ])?;
        }

        writer.flush()?;
        info!(path = %path.display(), rows = table.len(), "wrote state table");
        Ok(())
    }

    /// Columns: Date Local, <pollutant>, Samples
    pub fn write_trend(&self, trend: &DailyTrend, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_writer(create_file(path)?);
        writer.write_record(["Date Local", trend.metric.column_name(), "Samples"])?;

        for point in &trend.points {
            writer.write_record([
                point.date.format("%Y-%m-%d").to_string(),
                self.format_value(point.mean),
                point.samples.to_string(),
            ])?;
        }

        writer.flush()?;
        info!(path = %path.display(), rows = trend.len(), "wrote daily trend");
        Ok(())
    }

    /// Columns: Rank, State Abbr, <metric>
    pub fn write_ranking(
        &self,
        ranking: &[StateAggregate],
        metric_name: &str,
        path: &Path,
    ) -> Result<()> {
        let mut writer = csv::Writer::from_writer(create_file(path)?);
        writer.write_record(["Rank", "State Abbr", metric_name])?;

        for (i, entry) in ranking.iter().enumerate() {
            writer.write_record([
                (i + 1).to_string(),
                entry.state.to_string(),
                self.format_value(entry.mean),
            ])?;
        }

        writer.flush()?;
        info!(path = %path.display(), rows = ranking.len(), "wrote state ranking");
        Ok(())
    }

    fn format_value(&self, value: Option<f64>) -> String {
        value.map_or_else(String::new, |v| format!("{:.*}", self.decimals, v))
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}
