use crate::error::{ProcessingError, Result};
use crate::models::{Observation, StateCode};
use crate::utils::constants::DEFAULT_EXCLUDED_STATES;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Row accounting for a cleaning pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub excluded_rows: usize,
    pub retained_rows: usize,
    pub unmapped_rows: usize,
    /// State names without a postal code, with their row counts
    pub unmapped_states: BTreeMap<String, usize>,
}

impl CleaningReport {
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Rows read: {}\nRows excluded: {}\nRows retained: {}\nRows with unmapped state: {}",
            self.input_rows, self.excluded_rows, self.retained_rows, self.unmapped_rows
        );

        for (name, count) in &self.unmapped_states {
            summary.push_str(&format!("\n  - {} ({} rows)", name, count));
        }

        summary
    }
}

#[derive(Debug, Clone)]
pub struct CleanedDataset {
    pub observations: Vec<Observation>,
    pub report: CleaningReport,
}

/// Drops excluded regions and annotates rows with their postal code
pub struct DataCleaner {
    excluded_states: Vec<String>,
}

impl DataCleaner {
    pub fn new() -> Self {
        Self {
            excluded_states: DEFAULT_EXCLUDED_STATES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Exclude further state names on top of the default exclusions
    pub fn with_excluded_states(mut self, excluded_states: Vec<String>) -> Self {
        for name in excluded_states {
            let name = name.trim();
            if !name.is_empty() && !self.is_excluded(name) {
                self.excluded_states.push(name.to_string());
            }
        }
        self
    }

    pub fn is_excluded(&self, state: &str) -> bool {
        self.excluded_states.iter().any(|s| s == state)
    }

    /// Filter and annotate rows, discarding the cleaning report
    pub fn load_and_clean(&self, rows: Vec<Observation>) -> Result<Vec<Observation>> {
        Ok(self.clean(rows)?.observations)
    }

    /// Filter and annotate rows.
    ///
    /// Rows from an excluded state are removed. Every retained row gets
    /// `state_abbr` set from the static name table, or `None` for names the
    /// table does not know. A blank state name fails the whole pass.
    pub fn clean(&self, rows: Vec<Observation>) -> Result<CleanedDataset> {
        let mut report = CleaningReport {
            input_rows: rows.len(),
            ..CleaningReport::default()
        };
        let mut observations = Vec::with_capacity(rows.len());

        for (idx, mut row) in rows.into_iter().enumerate() {
            let state = row.state.trim();
            if state.is_empty() {
                return Err(ProcessingError::DataSchema(format!(
                    "record {}: missing State",
                    idx + 1
                )));
            }

            if self.is_excluded(state) {
                report.excluded_rows += 1;
                continue;
            }

            let abbr = StateCode::from_name(state);
            if abbr.is_none() {
                report.unmapped_rows += 1;
                *report
                    .unmapped_states
                    .entry(state.to_string())
                    .or_default() += 1;
            }

            row.state_abbr = abbr;
            observations.push(row);
        }

        report.retained_rows = observations.len();

        for name in report.unmapped_states.keys() {
            debug!(state = %name, "no postal code for state, grouping as unknown");
        }
        info!(
            input = report.input_rows,
            excluded = report.excluded_rows,
            unmapped = report.unmapped_rows,
            "cleaned dataset"
        );

        Ok(CleanedDataset {
            observations,
            report,
        })
    }
}

impl Default for DataCleaner {
    fn default() -> Self {
        Self::new()
    }
}
