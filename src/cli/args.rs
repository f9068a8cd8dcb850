use crate::models::Metric;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "us-aqi-processor")]
#[command(about = "Per-state air quality averages, extrema, trends and rankings from EPA pollution data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short,
        long,
        global = true,
        help = "Dataset to analyze; falls back to the bundled dataset when omitted"
    )]
    pub input: Option<PathBuf>,

    #[arg(long, global = true, help = "Bundled dataset path [default: pollution_us_2000_2016.csv]")]
    pub dataset: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file [default: us-aqi-processor.toml]")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Memory-map the input file")]
    pub mmap: bool,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide the progress spinner")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize per-state averages, best/worst states and the daily trend
    Summarize {
        #[arg(short, long, value_parser = Metric::parse_arg, help = "Metric averaged per state [default: NO2 AQI]")]
        metric: Option<Metric>,

        #[arg(short, long, value_parser = Metric::parse_arg, help = "Trend pollutant: NO2 Mean, O3 Mean, SO2 Mean or CO Mean")]
        pollutant: Option<Metric>,

        #[arg(short, long, help = "States listed at each end of the ranking")]
        limit: Option<usize>,

        #[arg(long, help = "Write the full report as JSON")]
        json: Option<PathBuf>,
    },

    /// Daily mean of a pollutant in chronological order
    Trend {
        #[arg(short, long, value_parser = Metric::parse_arg, help = "Trend pollutant: NO2 Mean, O3 Mean, SO2 Mean or CO Mean")]
        pollutant: Option<Metric>,

        #[arg(short, long, help = "Write the trend as CSV instead of printing it")]
        output: Option<PathBuf>,
    },

    /// States ranked by average, highest first
    Rank {
        #[arg(short, long, value_parser = Metric::parse_arg, help = "Metric averaged per state [default: NO2 AQI]")]
        metric: Option<Metric>,

        #[arg(short, long, help = "Only show the top N states")]
        limit: Option<usize>,

        #[arg(long, help = "Leave out rows whose state has no postal code")]
        known_only: bool,

        #[arg(short, long, help = "Write the ranking as CSV")]
        output: Option<PathBuf>,

        #[arg(long, help = "Write the per-state table (alphabetical) as CSV")]
        states_output: Option<PathBuf>,
    },

    /// Check schema, coverage and value ranges without aggregating
    Validate,
}
