use crate::models::{
    DailyAggregate, DailyTrend, Metric, Observation, StateAggregate, StateKey, StateTable,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Running sum for an arithmetic mean that skips missing values
#[derive(Debug, Default, Clone, Copy)]
struct MeanAccumulator {
    rows: usize,
    samples: usize,
    sum: f64,
}

impl MeanAccumulator {
    fn push(&mut self, value: Option<f64>) {
        self.rows += 1;
        if let Some(v) = value {
            self.samples += 1;
            self.sum += v;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.samples > 0).then(|| self.sum / self.samples as f64)
    }
}

/// Mean of `metric` per state key.
///
/// Rows without a postal code are grouped under [`StateKey::Unknown`]. Entries
/// come out ordered by key, so the unknown bucket is always last. Every row
/// counts towards its bucket's `records`; only rows with a value count towards
/// the mean.
pub fn aggregate_by_state(rows: &[Observation], metric: Metric) -> StateTable {
    let mut buckets: BTreeMap<StateKey, MeanAccumulator> = BTreeMap::new();

    for row in rows {
        buckets
            .entry(row.state_key())
            .or_default()
            .push(row.value(metric));
    }

    let entries: Vec<StateAggregate> = buckets
        .into_iter()
        .map(|(state, acc)| StateAggregate {
            state,
            mean: acc.mean(),
            records: acc.rows,
            samples: acc.samples,
        })
        .collect();

    debug!(%metric, states = entries.len(), "aggregated by state");
    StateTable { metric, entries }
}

/// Mean of `metric` per calendar date, in chronological order
pub fn aggregate_by_date(rows: &[Observation], metric: Metric) -> DailyTrend {
    let mut buckets: BTreeMap<NaiveDate, MeanAccumulator> = BTreeMap::new();

    for row in rows {
        buckets.entry(row.date).or_default().push(row.value(metric));
    }

    let points: Vec<DailyAggregate> = buckets
        .into_iter()
        .map(|(date, acc)| DailyAggregate {
            date,
            mean: acc.mean(),
            samples: acc.samples,
        })
        .collect();

    debug!(%metric, days = points.len(), "aggregated by date");
    DailyTrend { metric, points }
}
