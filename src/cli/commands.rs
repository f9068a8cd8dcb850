use crate::analyzers::{AirQualityAnalyzer, AirQualityReport};
use crate::cli::args::{Cli, Commands};
use crate::error::{ProcessingError, Result};
use crate::models::{Metric, Observation};
use crate::processors::{DataCleaner, IntegrityChecker};
use crate::readers::{DatasetSource, ObservationReader};
use crate::settings::Settings;
use crate::utils::progress::ProgressReporter;
use crate::writers::ReportWriter;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, Level};

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(dataset) = cli.dataset {
        settings.dataset = dataset;
    }
    if cli.mmap {
        settings.use_mmap = true;
    }

    let source = DatasetSource::resolve(cli.input.as_deref(), &settings.dataset);
    let quiet = cli.quiet;

    match cli.command {
        Commands::Summarize {
            metric,
            pollutant,
            limit,
            json,
        } => {
            apply_overrides(&mut settings, metric, pollutant, limit)?;
            let report = analyze(&source, &settings, quiet)?;

            println!("\n{}", report.detailed_summary(settings.ranking_limit));

            if let Some(path) = json {
                ReportWriter::new().write_json(&report, &path)?;
                println!("\nReport written to {}", path.display());
            }
        }

        Commands::Trend { pollutant, output } => {
            apply_overrides(&mut settings, None, pollutant, None)?;
            let analyzer = AirQualityAnalyzer::from_settings(&settings);
            let observations =
                load_observations(&source, &settings, &[settings.trend_pollutant], quiet)?;
            let trend = &analyzer.trend(observations)?;

            match output {
                Some(path) => {
                    ReportWriter::new().write_trend(trend, &path)?;
                    println!(
                        "Wrote {} daily {} values to {}",
                        trend.len(),
                        trend.metric,
                        path.display()
                    );
                }
                None => {
                    println!("Date Local  {}", trend.metric);
                    for point in &trend.points {
                        match point.mean {
                            Some(mean) => println!("{}  {:.4}", point.date, mean),
                            None => println!("{}  n/a", point.date),
                        }
                    }
                }
            }
        }

        Commands::Rank {
            metric,
            limit,
            known_only,
            output,
            states_output,
        } => {
            apply_overrides(&mut settings, metric, None, None)?;
            let report = analyze(&source, &settings, quiet)?;

            let ranking: Vec<_> = report
                .ranking
                .iter()
                .filter(|entry| !known_only || entry.state.is_known())
                .cloned()
                .collect();
            let shown = limit.unwrap_or(ranking.len());

            println!("Rank  State    {}", report.state_table.metric);
            for (i, entry) in ranking.iter().take(shown).enumerate() {
                let mean = entry
                    .mean
                    .map_or_else(|| "n/a".to_string(), |m| format!("{:.2}", m));
                println!("{:>4}  {:<7}  {}", i + 1, entry.state, mean);
            }

            let writer = ReportWriter::new();
            if let Some(path) = output {
                writer.write_ranking(
                    &ranking,
                    report.state_table.metric.column_name(),
                    &path,
                )?;
                println!("\nRanking written to {}", path.display());
            }
            if let Some(path) = states_output {
                let table = if known_only {
                    report.known_states()
                } else {
                    report.state_table.clone()
                };
                writer.write_state_table(&table, &path)?;
                println!("State table written to {}", path.display());
            }
        }

        Commands::Validate => {
            println!("Validating {}", source);

            let observations = load_observations(&source, &settings, &[], quiet)?;

            let checker = IntegrityChecker::new();
            let integrity = checker.check_integrity(&observations);
            println!("\n{}", checker.generate_summary(&integrity));

            let cleaned = DataCleaner::new()
                .with_excluded_states(settings.excluded_states.clone())
                .clean(observations)?;
            println!("=== Cleaning Report ===\n{}", cleaned.report.summary());

            if integrity.total_violations == 0 && cleaned.report.unmapped_rows == 0 {
                println!("\n✅ All data passed validation checks");
            } else {
                println!(
                    "\n⚠️  Found {} range violations and {} rows with unmapped states",
                    integrity.total_violations, cleaned.report.unmapped_rows
                );
            }
        }
    }

    Ok(())
}

fn apply_overrides(
    settings: &mut Settings,
    metric: Option<Metric>,
    pollutant: Option<Metric>,
    limit: Option<usize>,
) -> Result<()> {
    if let Some(metric) = metric {
        settings.state_metric = metric;
    }
    if let Some(pollutant) = pollutant {
        settings.trend_pollutant = pollutant;
    }
    if let Some(limit) = limit {
        settings.ranking_limit = limit;
    }
    settings.check()
}

fn analyze(source: &DatasetSource, settings: &Settings, quiet: bool) -> Result<AirQualityReport> {
    let analyzer = AirQualityAnalyzer::from_settings(settings);
    let observations = load_observations(source, settings, &analyzer.required_metrics(), quiet)?;
    analyzer.analyze(observations, Some(source.clone()))
}

fn load_observations(
    source: &DatasetSource,
    settings: &Settings,
    required_metrics: &[Metric],
    quiet: bool,
) -> Result<Vec<Observation>> {
    info!(%source, "loading dataset");

    let progress = ProgressReporter::new_spinner(&format!("Reading {}", source), quiet);
    let observations = ObservationReader::new()
        .with_mmap(settings.use_mmap)
        .with_required_metrics(required_metrics)
        .read_observations(source.path(), Some(&progress))?;
    progress.finish_with_message(&format!("Loaded {} rows from {}", observations.len(), source));

    Ok(observations)
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let result = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(|e| ProcessingError::Config(format!("failed to initialise logging: {}", e)))
}
