pub mod aggregate;
pub mod metric;
pub mod observation;
pub mod state;

pub use aggregate::{DailyAggregate, DailyTrend, Extrema, StateAggregate, StateTable};
pub use metric::Metric;
pub use observation::Observation;
pub use state::{StateCode, StateKey};
