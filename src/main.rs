use clap::Parser;
use us_aqi_processor::cli::{run, Cli};
use us_aqi_processor::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
