//! Scenario runner for comparing variants of one plan
//!
//! Holds the caller's current raw parameters and projects variants of them:
//! with and without the shock, with and without the fee, or across a range of
//! annual returns.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::params::{normalize, RawParams, RawValue, SimulationConfig};
use crate::projection::{project, SimulationResult};

/// Pre-loaded scenario runner for a base set of parameters
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(RawParams::new().with_amount(50.0).with_years(20.0));
///
/// for result in runner.sweep_returns(&[3.0, 5.0, 7.0]) {
///     println!("{:.2}", result.final_value);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    base: RawParams,
}

/// Baseline vs. stressed comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub baseline: SimulationResult,
    pub stressed: SimulationResult,
    /// `baseline.final_value - stressed.final_value`
    pub value_lost: f64,
    /// Loss relative to the baseline final value, in percent
    pub value_lost_pct: f64,
}

impl ImpactReport {
    fn new(baseline: SimulationResult, stressed: SimulationResult) -> Self {
        let value_lost = baseline.final_value - stressed.final_value;
        let value_lost_pct = if baseline.final_value > 0.0 {
            value_lost / baseline.final_value * 100.0
        } else {
            0.0
        };

        Self {
            baseline,
            stressed,
            value_lost,
            value_lost_pct,
        }
    }
}

impl ScenarioRunner {
    pub fn new(base: RawParams) -> Self {
        Self { base }
    }

    /// Normalized base configuration
    pub fn config(&self) -> SimulationConfig {
        normalize(&self.base)
    }

    pub fn base(&self) -> &RawParams {
        &self.base
    }

    /// Merge an update into the base (e.g. a user changing one parameter)
    pub fn update(&mut self, overlay: &RawParams) {
        self.base = self.base.merge(overlay);
    }

    /// Project the base parameters
    pub fn run(&self) -> SimulationResult {
        project(&self.config())
    }

    /// Project the base parameters with an overlay applied
    pub fn run_with(&self, overlay: &RawParams) -> SimulationResult {
        project(&normalize(&self.base.merge(overlay)))
    }

    /// What the configured shock costs compared to a calm market
    pub fn shock_impact(&self) -> ImpactReport {
        let config = self.config();
        ImpactReport::new(project(&config.without_shock()), project(&config))
    }

    /// What the configured fee costs compared to a fee-free fund
    pub fn fee_impact(&self) -> ImpactReport {
        let config = self.config();
        ImpactReport::new(project(&config.without_fee()), project(&config))
    }

    /// Project the base parameters for each annual return, in parallel
    pub fn sweep_returns(&self, annual_returns_pct: &[f64]) -> Vec<SimulationResult> {
        annual_returns_pct
            .par_iter()
            .map(|&ret| {
                let overlay = RawParams {
                    annual_return_pct: Some(RawValue::Number(ret)),
                    ..RawParams::default()
                };
                self.run_with(&overlay)
            })
            .collect()
    }
}
