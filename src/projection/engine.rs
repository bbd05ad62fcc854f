//! Core projection engine for periodic contribution projections

use log::{debug, trace};

use super::rates::{inflation_deflator, period_fee_factor, period_growth_rate};
use super::result::SimulationResult;
use super::state::ProjectionState;
use crate::params::SimulationConfig;

/// Main projection engine
///
/// Expects a configuration produced by [`crate::params::normalize`]. Each call
/// to [`ProjectionEngine::project`] starts from fresh state.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    config: SimulationConfig,

    /// Per-period growth rate derived from the annual return
    growth_rate: f64,

    /// Per-period multiplier left after fees
    fee_factor: f64,

    /// Total number of periods in the horizon
    total_periods: u32,

    /// Period at which the shock fires, with its percentage
    shock: Option<(u32, f64)>,
}

impl ProjectionEngine {
    /// Create a new projection engine for a normalized configuration
    pub fn new(config: SimulationConfig) -> Self {
        let growth_rate = period_growth_rate(config.annual_return_pct, config.periods_per_year);
        let fee_factor = period_fee_factor(config.annual_fee_pct, config.periods_per_year);
        let total_periods = config.total_periods();
        let shock = config.shock.and_then(|s| {
            shock_period(s.at_year, config.periods_per_year, total_periods).map(|p| (p, s.pct_drop))
        });

        Self {
            config,
            growth_rate,
            fee_factor,
            total_periods,
            shock,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn total_periods(&self) -> u32 {
        self.total_periods
    }

    /// Period the shock will fire in, if any
    pub fn shock_period(&self) -> Option<u32> {
        self.shock.map(|(period, _)| period)
    }

    /// Run the projection
    pub fn project(&self) -> SimulationResult {
        let config = &self.config;
        let periods_per_year = config.periods_per_year;
        let mut result = SimulationResult::new(config.periodic_amount, periods_per_year);
        result.series.reserve(self.total_periods as usize);

        let mut state = ProjectionState::new();

        for _period in 1..=self.total_periods {
            state.advance_period();
            self.step(&mut state);

            result.series.push(state.value);
            if state.period % periods_per_year == 0 {
                result.add_milestone(f64::from(state.period / periods_per_year), state.value);
            }
        }

        if self.total_periods > 0 {
            let final_year = f64::from(self.total_periods) / f64::from(periods_per_year);
            result.add_milestone(final_year, state.value);
        }

        result.total_contributed = state.contributed;
        result.final_value = state.value;
        result.total_gains = result.final_value - result.total_contributed;
        result.max_drawdown_pct = state.min_drawdown * 100.0;
        result.recovery_periods = state.recovery_periods;
        result.shock_period = state.shock_period;
        result.recovery_target = state.recovery_target;
        result.inflation_adjusted_final_value =
            result.final_value / inflation_deflator(config.inflation_pct, config.horizon_years);

        debug!(
            "projected {} periods: contributed {:.2}, final {:.2}, max drawdown {:.2}%",
            self.total_periods, result.total_contributed, result.final_value, result.max_drawdown_pct
        );

        result
    }

    /// One period: contribute, grow, charge fees, shock, then bookkeeping
    fn step(&self, state: &mut ProjectionState) {
        state.contribute(self.config.periodic_amount);
        state.value *= 1.0 + self.growth_rate;
        state.value *= self.fee_factor;

        if let Some((period, pct_drop)) = self.shock {
            if state.period == period {
                state.apply_shock(pct_drop);
                trace!(
                    "shock of {}% at period {}, recovery target {:?}",
                    pct_drop, period, state.recovery_target
                );
            }
        }

        state.update_peak_and_drawdown();
        state.track_recovery();
    }
}

/// Period a shock at `at_year` lands in, clamped to `[1, total_periods]`
///
/// None when there are no periods to shock.
pub fn shock_period(at_year: f64, periods_per_year: u32, total_periods: u32) -> Option<u32> {
    if total_periods == 0 {
        return None;
    }
    let raw = (at_year * f64::from(periods_per_year)).round();
    Some((raw.max(1.0) as u32).min(total_periods))
}

/// Project a normalized configuration
pub fn project(config: &SimulationConfig) -> SimulationResult {
    ProjectionEngine::new(config.clone()).project()
}
