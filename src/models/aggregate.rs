use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Metric, StateKey};

/// Mean of one metric over every row sharing a state key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateAggregate {
    pub state: StateKey,
    /// `None` when no row in the bucket carried a value for the metric
    pub mean: Option<f64>,
    /// Rows in the bucket, with or without a metric value
    pub records: usize,
    /// Rows that contributed to the mean
    pub samples: usize,
}

/// Per-state means, ordered by state key (known codes alphabetically, unknown last)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateTable {
    pub metric: Metric,
    pub entries: Vec<StateAggregate>,
}

impl StateTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateAggregate> {
        self.entries.iter()
    }

    pub fn get(&self, state: &StateKey) -> Option<&StateAggregate> {
        self.entries
            .binary_search_by(|entry| entry.state.cmp(state))
            .ok()
            .map(|idx| &self.entries[idx])
    }

    pub fn total_records(&self) -> usize {
        self.entries.iter().map(|e| e.records).sum()
    }

    /// The table without the unknown bucket, for renderers keyed on postal codes
    pub fn known_states(&self) -> StateTable {
        StateTable {
            metric: self.metric,
            entries: self
                .entries
                .iter()
                .filter(|e| e.state.is_known())
                .cloned()
                .collect(),
        }
    }
}

/// Most and least polluted entries of a state table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extrema {
    pub max: StateAggregate,
    pub min: StateAggregate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub mean: Option<f64>,
    pub samples: usize,
}

/// Per-date means in chronological order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTrend {
    pub metric: Metric,
    pub points: Vec<DailyAggregate>,
}

impl DailyTrend {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.points.first()?.date, self.points.last()?.date))
    }

    /// Date with the highest daily mean; earliest date wins ties
    pub fn peak(&self) -> Option<&DailyAggregate> {
        self.points
            .iter()
            .filter(|p| p.mean.is_some())
            .fold(None, |best: Option<&DailyAggregate>, point| match best {
                Some(b) if b.mean >= point.mean => Some(b),
                _ => Some(point),
            })
    }
}
