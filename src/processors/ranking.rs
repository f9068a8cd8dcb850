use crate::error::{ProcessingError, Result};
use crate::models::{Extrema, StateAggregate, StateTable};
use std::cmp::Ordering;

/// Highest and lowest state means.
///
/// Entries without a mean are skipped. Ties resolve to the entry that appears
/// first in the table.
pub fn find_extrema(table: &StateTable) -> Result<Extrema> {
    if table.is_empty() {
        return Err(ProcessingError::EmptyDataset(format!(
            "no state aggregates for {}",
            table.metric
        )));
    }

    let mut max: Option<(&StateAggregate, f64)> = None;
    let mut min: Option<(&StateAggregate, f64)> = None;

    for entry in table.iter() {
        let Some(value) = entry.mean else { continue };

        if max.map_or(true, |(_, best)| value > best) {
            max = Some((entry, value));
        }
        if min.map_or(true, |(_, best)| value < best) {
            min = Some((entry, value));
        }
    }

    match (max, min) {
        (Some((max, _)), Some((min, _))) => Ok(Extrema {
            max: max.clone(),
            min: min.clone(),
        }),
        _ => Err(ProcessingError::EmptyDataset(format!(
            "no state has a value for {}",
            table.metric
        ))),
    }
}

/// States ordered by mean, highest first.
///
/// The sort is stable so equal means keep table order; entries without a
/// mean go last.
pub fn rank_states(table: &StateTable) -> Result<Vec<StateAggregate>> {
    if table.is_empty() {
        return Err(ProcessingError::EmptyDataset(format!(
            "no state aggregates to rank for {}",
            table.metric
        )));
    }

    let mut ranked = table.entries.clone();
    ranked.sort_by(|a, b| compare_descending(a.mean, b.mean));
    Ok(ranked)
}

fn compare_descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
