pub mod aggregator;
pub mod cleaner;
pub mod integrity_checker;
pub mod ranking;

pub use aggregator::{aggregate_by_date, aggregate_by_state};
pub use cleaner::{CleanedDataset, CleaningReport, DataCleaner};
pub use integrity_checker::{IntegrityChecker, IntegrityReport, MetricCoverage, RangeViolation};
pub use ranking::{find_extrema, rank_states};
