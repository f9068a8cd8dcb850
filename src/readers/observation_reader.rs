use crate::error::{ProcessingError, Result};
use crate::models::{Metric, Observation};
use crate::utils::constants::{
    DATE_COLUMN, DATE_FORMATS, DEFAULT_BUFFER_SIZE, PROGRESS_UPDATE_INTERVAL, STATE_COLUMN,
};
use crate::utils::ProgressReporter;
use chrono::NaiveDate;
use csv::StringRecord;
use memmap2::Mmap;
use std::borrow::Cow;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

/// Reads pollution observations from a delimited-text file with a header row
pub struct ObservationReader {
    use_mmap: bool,
    delimiter: u8,
    required_metrics: Vec<Metric>,
}

impl ObservationReader {
    pub fn new() -> Self {
        Self {
            use_mmap: false,
            delimiter: b',',
            required_metrics: Vec::new(),
        }
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Metric columns that must be present in the header in addition to State and Date Local
    pub fn with_required_metrics(mut self, metrics: &[Metric]) -> Self {
        self.required_metrics = metrics.to_vec();
        self
    }

    /// Read every observation in the file
    pub fn read_observations(
        &self,
        path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<Observation>> {
        debug!(path = %path.display(), mmap = self.use_mmap, "reading observations");

        let file = File::open(path)?;
        if self.use_mmap && file.metadata()?.len() > 0 {
            let mmap = unsafe { Mmap::map(&file)? };
            self.read_from_bytes(&mmap, progress)
        } else {
            drop(file);
            let bytes = std::fs::read(path)?;
            self.read_from_bytes(&bytes, progress)
        }
    }

    /// Parse observations from raw file contents; non-UTF-8 input is decoded as Windows-1252
    pub fn read_from_bytes(
        &self,
        bytes: &[u8],
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<Observation>> {
        let text = decode_input(bytes);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .flexible(true)
            .buffer_capacity(DEFAULT_BUFFER_SIZE)
            .from_reader(text.as_bytes());

        let layout = ColumnLayout::from_headers(reader.headers()?, &self.required_metrics)?;
        debug!(columns = ?layout.metrics, "resolved column layout");

        let mut observations = Vec::new();
        let mut record = StringRecord::new();
        let mut row: u64 = 0;

        while reader.read_record(&mut record)? {
            row += 1;
            observations.push(layout.parse_record(&record, row)?);

            if row % PROGRESS_UPDATE_INTERVAL == 0 {
                if let Some(progress) = progress {
                    progress.update(row);
                }
            }
        }

        if let Some(progress) = progress {
            progress.update(row);
        }

        debug!(rows = observations.len(), "finished reading observations");
        Ok(observations)
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Column indices resolved from the header row
#[derive(Debug)]
struct ColumnLayout {
    state: usize,
    date: usize,
    metrics: Vec<(Metric, usize)>,
}

impl ColumnLayout {
    fn from_headers(headers: &StringRecord, required_metrics: &[Metric]) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let missing = |name: &str| {
            ProcessingError::DataSchema(format!("required column '{}' not found in header", name))
        };

        let state = find(STATE_COLUMN).ok_or_else(|| missing(STATE_COLUMN))?;
        let date = find(DATE_COLUMN).ok_or_else(|| missing(DATE_COLUMN))?;

        let metrics: Vec<(Metric, usize)> = Metric::ALL
            .iter()
            .filter_map(|&metric| find(metric.column_name()).map(|idx| (metric, idx)))
            .collect();

        for required in required_metrics {
            if !metrics.iter().any(|(metric, _)| metric == required) {
                return Err(missing(required.column_name()));
            }
        }

        Ok(Self {
            state,
            date,
            metrics,
        })
    }

    fn parse_record(&self, record: &StringRecord, row: u64) -> Result<Observation> {
        let state = record
            .get(self.state)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ProcessingError::DataSchema(format!("row {}: missing State", row)))?;

        let raw_date = record.get(self.date).unwrap_or_default();
        let date = parse_date(raw_date).ok_or_else(|| {
            ProcessingError::DataSchema(format!("row {}: invalid Date Local '{}'", row, raw_date))
        })?;

        let mut observation = Observation::new(state, date);
        for &(metric, idx) in &self.metrics {
            observation.set_value(metric, record.get(idx).and_then(parse_value));
        }

        Ok(observation)
    }
}

/// Parse a `Date Local` cell, ignoring any time-of-day suffix
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split_whitespace().next()?;
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

/// Parse a numeric cell; empty, non-numeric and non-finite cells are missing
pub fn parse_value(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn decode_input(bytes: &[u8]) -> Cow<'_, str> {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if !had_errors {
        return text;
    }

    warn!("input is not valid UTF-8, decoding as Windows-1252");
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        ",State Code,County Code,Site Num,Address,State,County,City,Date Local,NO2 Units,NO2 Mean,NO2 1st Max Value,NO2 1st Max Hour,NO2 AQI,O3 Units,O3 Mean,O3 1st Max Value,O3 1st Max Hour,O3 AQI,SO2 Units,SO2 Mean,SO2 1st Max Value,SO2 1st Max Hour,SO2 AQI,CO Units,CO Mean,CO 1st Max Value,CO 1st Max Hour,CO AQI";

    fn epa_row(index: usize, state: &str, date: &str, no2_mean: &str, no2_aqi: &str) -> String {
        format!(
            "{},04,013,3002,1645 E ROOSEVELT ST-CENTRAL PHOENIX STN,{},Maricopa,Phoenix,{},Parts per billion,{},49.0,19,{},Parts per million,0.0225,0.04,10,34,Parts per billion,3.0,9.0,21,13.0,Parts per million,1.145833,4.2,21,",
            index, state, date, no2_mean, no2_aqi
        )
    }

    #[test]
    fn test_parse_epa_layout() -> Result<()> {
        let csv = [
            HEADER.to_string(),
            epa_row(0, "Arizona", "2000-01-01", "19.041667", "46"),
            epa_row(1, "Arizona", "2000-01-02", "22.958333", ""),
        ]
        .join("\n");

        let observations = ObservationReader::new().read_from_bytes(csv.as_bytes(), None)?;

        assert_eq!(observations.len(), 2);
        let first = &observations[0];
        assert_eq!(first.state, "Arizona");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(first.value(Metric::No2Aqi), Some(46.0));
        assert_eq!(first.value(Metric::O3Mean), Some(0.0225));
        assert_eq!(first.value(Metric::So2Aqi), Some(13.0));
        assert_eq!(first.value(Metric::CoAqi), None);
        assert_eq!(observations[1].value(Metric::No2Aqi), None);
        assert!(first.state_abbr.is_none());

        Ok(())
    }

    #[test]
    fn test_missing_required_column_is_schema_error() {
        let csv = "State,NO2 AQI\nArizona,46\n";
        let err = ObservationReader::new()
            .read_from_bytes(csv.as_bytes(), None)
            .unwrap_err();
        assert!(matches!(err, ProcessingError::DataSchema(msg) if msg.contains("Date Local")));

        let csv = "State,Date Local,NO2 AQI\nArizona,2000-01-01,46\n";
        let err = ObservationReader::new()
            .with_required_metrics(&[Metric::CoMean])
            .read_from_bytes(csv.as_bytes(), None)
            .unwrap_err();
        assert!(matches!(err, ProcessingError::DataSchema(msg) if msg.contains("CO Mean")));
    }

    #[test]
    fn test_blank_state_and_bad_date_are_schema_errors() {
        let csv = "State,Date Local,NO2 AQI\n,2000-01-01,46\n";
        let err = ObservationReader::new()
            .read_from_bytes(csv.as_bytes(), None)
            .unwrap_err();
        assert!(matches!(err, ProcessingError::DataSchema(msg) if msg.contains("row 1")));

        let csv = "State,Date Local,NO2 AQI\nTexas,2000-01-01,46\nTexas,not-a-date,3\n";
        let err = ObservationReader::new()
            .read_from_bytes(csv.as_bytes(), None)
            .unwrap_err();
        assert!(matches!(err, ProcessingError::DataSchema(msg) if msg.contains("row 2")));
    }

    #[test]
    fn test_non_numeric_values_are_missing() -> Result<()> {
        let csv = "State,Date Local,NO2 AQI,NO2 Mean\nTexas,2000-01-01,n/a,NaN\n";
        let observations = ObservationReader::new().read_from_bytes(csv.as_bytes(), None)?;

        assert_eq!(observations[0].value(Metric::No2Aqi), None);
        assert_eq!(observations[0].value(Metric::No2Mean), None);
        Ok(())
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2016, 4, 30);
        assert_eq!(parse_date("2016-04-30"), expected);
        assert_eq!(parse_date("2016-04-30 00:00:00"), expected);
        assert_eq!(parse_date("04/30/2016"), expected);
        assert_eq!(parse_date("30.04.2016"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_windows_1252_fallback() -> Result<()> {
        // "Québec" encoded as Windows-1252
        let mut bytes = b"State,Date Local,NO2 AQI\nQu".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"bec,2000-01-01,12\n");

        let observations = ObservationReader::new().read_from_bytes(&bytes, None)?;
        assert_eq!(observations[0].state, "Québec");
        Ok(())
    }

    #[test]
    fn test_read_file_with_and_without_mmap() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "State,Date Local,NO2 AQI")?;
        writeln!(temp_file, "California,2001-05-01,10")?;
        writeln!(temp_file, "Texas,2001-05-01,5")?;
        temp_file.flush()?;

        let buffered = ObservationReader::new().read_observations(temp_file.path(), None)?;
        let mapped = ObservationReader::new()
            .with_mmap(true)
            .read_observations(temp_file.path(), None)?;

        assert_eq!(buffered.len(), 2);
        assert_eq!(buffered, mapped);
        Ok(())
    }
}
