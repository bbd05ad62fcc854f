//! DCA projection CLI
//!
//! Command-line interface for running a single projection

use anyhow::{Context, Result};
use clap::Parser;
use dca_projection::params::{find_preset, load_presets};
use dca_projection::{normalize, project, PeriodFrequency, Preset, RawParams, RawValue};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "dca_projection", version, about = "Project a dollar-cost averaging plan")]
struct Args {
    /// Amount invested every period
    #[arg(long)]
    amount: Option<f64>,

    /// Investment horizon in years
    #[arg(long)]
    years: Option<f64>,

    /// Expected annual return in percent
    #[arg(long = "return", allow_negative_numbers = true)]
    annual_return: Option<f64>,

    /// Annual management fee in percent
    #[arg(long)]
    fee: Option<f64>,

    /// One-time shock in percent (e.g. -30); needs --shock-year
    #[arg(long, allow_negative_numbers = true)]
    shock_pct: Option<f64>,

    /// Year the shock hits; needs --shock-pct
    #[arg(long)]
    shock_year: Option<f64>,

    /// Contribution frequency: weekly, monthly, quarterly or annual
    #[arg(long, default_value = "weekly")]
    frequency: PeriodFrequency,

    /// Annual inflation in percent
    #[arg(long)]
    inflation: Option<f64>,

    /// Fund preset id supplying return and fee
    #[arg(long)]
    preset: Option<String>,

    /// CSV file with presets (id,name,annual_return_pct,annual_fee_pct)
    #[arg(long)]
    presets_file: Option<PathBuf>,

    /// List available presets and exit
    #[arg(long)]
    list_presets: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Write the per-period series to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl Args {
    fn raw_params(&self) -> RawParams {
        let num = |v: Option<f64>| v.map(RawValue::Number);
        RawParams {
            periodic_amount: num(self.amount),
            horizon_years: num(self.years),
            annual_return_pct: num(self.annual_return),
            annual_fee_pct: num(self.fee),
            shock_pct: num(self.shock_pct),
            shock_year: num(self.shock_year),
            periods_per_year: Some(RawValue::from(self.frequency.periods_per_year())),
            inflation_pct: num(self.inflation),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let presets = match &args.presets_file {
        Some(path) => load_presets(path)
            .with_context(|| format!("loading presets from {}", path.display()))?,
        None => Preset::builtin(),
    };

    if args.list_presets {
        for p in &presets {
            println!("{:<12} {:<28} return {:>5.2}%  fee {:>4.2}%", p.id, p.name, p.annual_return_pct, p.annual_fee_pct);
        }
        return Ok(());
    }

    let mut raw = RawParams::default();
    if let Some(id) = &args.preset {
        raw = find_preset(&presets, id)?.apply(&raw);
    }
    // Explicit flags win over the preset
    let raw = raw.merge(&args.raw_params());

    if args.shock_pct.is_some() != args.shock_year.is_some() {
        log::warn!("shock needs both --shock-pct and --shock-year; ignoring it");
    }

    let config = normalize(&raw);
    let result = project(&config);

    if let Some(path) = &args.csv {
        write_series(path, &result.series)
            .with_context(|| format!("writing series to {}", path.display()))?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("DCA Projection");
    println!("==============\n");
    println!("  Contribution: ${:.2} {}", config.periodic_amount, args.frequency);
    println!("  Horizon: {} years ({} periods)", config.horizon_years, config.total_periods());
    println!("  Annual return: {:.2}%  Fee: {:.2}%", config.annual_return_pct, config.annual_fee_pct);
    match config.shock {
        Some(shock) => println!("  Shock: {:.1}% at year {}", shock.pct_drop, shock.at_year),
        None => println!("  Shock: none"),
    }
    println!();

    println!("Milestones:");
    println!("{:>6} {:>16}", "Year", "Value");
    println!("{}", "-".repeat(23));
    for m in &result.milestones {
        println!("{:>6} {:>16.2}", m.year, m.value);
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Total contributed: ${:.2}", summary.total_contributed);
    println!("  Final value: ${:.2}", summary.final_value);
    println!("  Total gains: ${:.2}", summary.total_gains);
    println!("  Growth multiple: {:.3}x", summary.growth_multiple);
    if let Some(mwr) = summary.money_weighted_return_pct {
        println!("  Money-weighted return: {:.2}% p.a.", mwr);
    }
    println!("  Max drawdown: {:.2}%", summary.max_drawdown_pct);
    println!(
        "  Real final value ({:.1}% inflation): ${:.2}",
        config.inflation_pct, summary.inflation_adjusted_final_value
    );

    if let Some(period) = result.shock_period {
        println!("\nShock hit in period {}.", period);
        match result.recovery_periods {
            Some(n) => println!(
                "  Recovered to the pre-shock peak after {} periods ({:.1} years).",
                n,
                f64::from(n) / f64::from(config.periods_per_year)
            ),
            None => println!("  Did not recover to the pre-shock peak within the horizon."),
        }
    }

    Ok(())
}

fn write_series(path: &Path, series: &[f64]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["period", "value"])?;
    for (idx, value) in series.iter().enumerate() {
        writer.write_record(&[(idx + 1).to_string(), format!("{:.8}", value)])?;
    }
    writer.flush()?;
    println!("Series written to: {}", path.display());
    Ok(())
}
