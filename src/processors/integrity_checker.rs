use crate::models::{Metric, Observation};
use crate::utils::constants::{MAX_REPORTED_VIOLATIONS, MAX_VALID_AQI, MIN_VALID_AQI};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub total_records: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub metric_coverage: BTreeMap<Metric, MetricCoverage>,
    pub range_violations: Vec<RangeViolation>,
    pub total_violations: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricCoverage {
    pub present: usize,
    pub missing: usize,
}

impl MetricCoverage {
    pub fn present_percentage(&self) -> f64 {
        let total = self.present + self.missing;
        if total == 0 {
            0.0
        } else {
            100.0 * self.present as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeViolation {
    /// 1-based position in the checked slice
    pub row: usize,
    pub state: String,
    pub date: NaiveDate,
    pub metric: Metric,
    pub value: f64,
    pub violation_type: ViolationType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViolationType {
    NegativeConcentration,
    AqiOutOfRange,
}

/// Reports coverage and implausible values without rejecting any rows
pub struct IntegrityChecker {
    max_reported: usize,
}

impl IntegrityChecker {
    pub fn new() -> Self {
        Self {
            max_reported: MAX_REPORTED_VIOLATIONS,
        }
    }

    pub fn with_max_reported(max_reported: usize) -> Self {
        Self { max_reported }
    }

    pub fn check_integrity(&self, records: &[Observation]) -> IntegrityReport {
        let mut report = IntegrityReport {
            total_records: records.len(),
            date_range: None,
            metric_coverage: Metric::ALL
                .iter()
                .map(|&m| (m, MetricCoverage::default()))
                .collect(),
            range_violations: Vec::new(),
            total_violations: 0,
        };

        for (idx, record) in records.iter().enumerate() {
            report.date_range = Some(match report.date_range {
                Some((first, last)) => (first.min(record.date), last.max(record.date)),
                None => (record.date, record.date),
            });

            for metric in Metric::ALL {
                let coverage = report.metric_coverage.entry(metric).or_default();
                let Some(value) = record.value(metric) else {
                    coverage.missing += 1;
                    continue;
                };
                coverage.present += 1;

                if let Some(violation_type) = classify(metric, value) {
                    report.total_violations += 1;
                    if report.range_violations.len() < self.max_reported {
                        report.range_violations.push(RangeViolation {
                            row: idx + 1,
                            state: record.state.clone(),
                            date: record.date,
                            metric,
                            value,
                            violation_type,
                        });
                    }
                }
            }
        }

        report
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        if let Some((first, last)) = report.date_range {
            summary.push_str(&format!("Date Range: {} to {}\n", first, last));
        }

        summary.push_str("\nMetric Coverage:\n");
        for (metric, coverage) in &report.metric_coverage {
            summary.push_str(&format!(
                "  {:<9} {} present, {} missing ({:.1}%)\n",
                metric.column_name(),
                coverage.present,
                coverage.missing,
                coverage.present_percentage()
            ));
        }

        summary.push_str(&format!("\nRange Violations: {}\n", report.total_violations));

        if !report.range_violations.is_empty() {
            summary.push_str("\nTop 10 Violations:\n");
            for (i, violation) in report.range_violations.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. Row {} ({} on {}): {} = {}\n",
                    i + 1,
                    violation.row,
                    violation.state,
                    violation.date,
                    violation.metric,
                    violation.value
                ));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}

fn classify(metric: Metric, value: f64) -> Option<ViolationType> {
    if metric.is_aqi() {
        let in_range = (MIN_VALID_AQI..=MAX_VALID_AQI).contains(&value);
        (!in_range).then_some(ViolationType::AqiOutOfRange)
    } else {
        (value < 0.0).then_some(ViolationType::NegativeConcentration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2003, 2, day).unwrap()
    }

    #[test]
    fn test_coverage_and_date_range() {
        let records = vec![
            Observation::new("Ohio", date(9)).with_value(Metric::No2Aqi, Some(20.0)),
            Observation::new("Ohio", date(2)).with_value(Metric::No2Mean, Some(11.0)),
        ];

        let report = IntegrityChecker::new().check_integrity(&records);

        assert_eq!(report.total_records, 2);
        assert_eq!(report.date_range, Some((date(2), date(9))));
        let aqi = report.metric_coverage[&Metric::No2Aqi];
        assert_eq!(aqi, MetricCoverage { present: 1, missing: 1 });
        assert_eq!(aqi.present_percentage(), 50.0);
        assert_eq!(report.total_violations, 0);
    }

    #[test]
    fn test_range_violations_are_reported_not_fatal() {
        let records = vec![
            Observation::new("Ohio", date(1))
                .with_value(Metric::No2Aqi, Some(612.0))
                .with_value(Metric::CoMean, Some(-0.1)),
            Observation::new("Utah", date(1)).with_value(Metric::So2Aqi, Some(-3.0)),
        ];

        let checker = IntegrityChecker::with_max_reported(2);
        let report = checker.check_integrity(&records);

        assert_eq!(report.total_violations, 3);
        assert_eq!(report.range_violations.len(), 2);
        assert_eq!(
            report.range_violations[0].violation_type,
            ViolationType::NegativeConcentration
        );
        assert_eq!(report.range_violations[1].metric, Metric::No2Aqi);

        let summary = checker.generate_summary(&report);
        assert!(summary.contains("Range Violations: 3"));
        assert!(summary.contains("Row 1 (Ohio on 2003-02-01)"));
    }

    #[test]
    fn test_empty_input() {
        let report = IntegrityChecker::new().check_integrity(&[]);
        assert_eq!(report.total_records, 0);
        assert!(report.date_range.is_none());
        assert_eq!(report.metric_coverage[&Metric::CoAqi].present_percentage(), 0.0);
    }
}
