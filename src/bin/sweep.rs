//! Sweep a plan across a grid of annual returns
//!
//! Runs one projection per return rate in parallel and writes final values to CSV

use anyhow::{ensure, Context, Result};
use clap::Parser;
use dca_projection::{PeriodFrequency, RawParams, ScenarioRunner};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "sweep", about = "Project a DCA plan across a range of annual returns")]
struct Args {
    #[arg(long, default_value_t = 100.0)]
    amount: f64,

    #[arg(long, default_value_t = 20.0)]
    years: f64,

    #[arg(long, default_value_t = 0.0)]
    fee: f64,

    #[arg(long, default_value = "monthly")]
    frequency: PeriodFrequency,

    /// Lowest annual return in percent
    #[arg(long, default_value_t = -5.0, allow_negative_numbers = true)]
    min_return: f64,

    /// Highest annual return in percent
    #[arg(long, default_value_t = 12.0, allow_negative_numbers = true)]
    max_return: f64,

    #[arg(long, default_value_t = 0.5)]
    step: f64,

    #[arg(long, default_value = "return_sweep.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    ensure!(args.step > 0.0, "--step must be positive");
    ensure!(args.max_return >= args.min_return, "--max-return must not be below --min-return");

    let steps = ((args.max_return - args.min_return) / args.step).floor() as usize;
    let returns: Vec<f64> = (0..=steps)
        .map(|i| args.min_return + i as f64 * args.step)
        .collect();

    let runner = ScenarioRunner::new(
        RawParams::new()
            .with_amount(args.amount)
            .with_years(args.years)
            .with_fee(args.fee)
            .with_periods_per_year(args.frequency.periods_per_year()),
    );

    println!("Running {} projections...", returns.len());
    let start = Instant::now();
    let results = runner.sweep_returns(&returns);
    println!("Projections complete in {:?}", start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    writer.write_record([
        "annual_return_pct",
        "total_contributed",
        "final_value",
        "total_gains",
        "inflation_adjusted_final_value",
    ])?;

    for (ret, result) in returns.iter().zip(&results) {
        writer.write_record(&[
            format!("{:.2}", ret),
            format!("{:.2}", result.total_contributed),
            format!("{:.2}", result.final_value),
            format!("{:.2}", result.total_gains),
            format!("{:.2}", result.inflation_adjusted_final_value),
        ])?;
    }
    writer.flush()?;

    println!("Output written to {}", args.output.display());

    if let (Some(first), Some(last)) = (results.first(), results.last()) {
        println!("\nSweep Summary:");
        println!("  {:>6.2}%: final ${:.0}", returns[0], first.final_value);
        println!("  {:>6.2}%: final ${:.0}", returns[returns.len() - 1], last.final_value);
    }

    Ok(())
}
