pub mod observation_reader;
pub mod source;

pub use observation_reader::{parse_date, parse_value, ObservationReader};
pub use source::DatasetSource;
