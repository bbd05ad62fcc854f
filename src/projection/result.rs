//! Output structures for projections

use serde::{Deserialize, Serialize};

use super::irr::money_weighted_return;

/// Portfolio value snapshot at a year boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Completed years; fractional only for the final snapshot
    pub year: f64,
    pub value: f64,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub total_contributed: f64,
    pub final_value: f64,
    /// Always `final_value - total_contributed`
    pub total_gains: f64,

    /// Largest peak-to-trough decline in percent (<= 0)
    pub max_drawdown_pct: f64,

    /// Periods after the shock until the pre-shock peak was reached again
    pub recovery_periods: Option<u32>,

    /// Period the shock fired in
    pub shock_period: Option<u32>,

    /// Pre-shock peak used as the recovery target
    pub recovery_target: Option<f64>,

    /// Value at the end of every period
    pub series: Vec<f64>,

    /// Snapshots at whole years, plus the final period
    pub milestones: Vec<Milestone>,

    pub inflation_adjusted_final_value: f64,

    /// Contribution per period, kept for return calculations
    pub periodic_amount: f64,

    pub periods_per_year: u32,
}

impl SimulationResult {
    pub fn new(periodic_amount: f64, periods_per_year: u32) -> Self {
        Self {
            total_contributed: 0.0,
            final_value: 0.0,
            total_gains: 0.0,
            max_drawdown_pct: 0.0,
            recovery_periods: None,
            shock_period: None,
            recovery_target: None,
            series: Vec::new(),
            milestones: Vec::new(),
            inflation_adjusted_final_value: 0.0,
            periodic_amount,
            periods_per_year,
        }
    }

    /// Record a milestone, replacing one already stored for the same year
    pub fn add_milestone(&mut self, year: f64, value: f64) {
        match self.milestones.last_mut() {
            Some(last) if last.year == year => last.value = value,
            _ => self.milestones.push(Milestone { year, value }),
        }
    }

    /// Value recorded at a given year, if any
    pub fn milestone(&self, year: f64) -> Option<f64> {
        self.milestones
            .iter()
            .find(|m| (m.year - year).abs() < 1e-9)
            .map(|m| m.value)
    }

    pub fn total_periods(&self) -> u32 {
        self.series.len() as u32
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let growth_multiple = if self.total_contributed > 0.0 {
            self.final_value / self.total_contributed
        } else {
            0.0
        };

        ProjectionSummary {
            total_periods: self.total_periods(),
            total_contributed: self.total_contributed,
            final_value: self.final_value,
            total_gains: self.total_gains,
            growth_multiple,
            money_weighted_return_pct: money_weighted_return(self).map(|r| r * 100.0),
            max_drawdown_pct: self.max_drawdown_pct,
            recovery_periods: self.recovery_periods,
            inflation_adjusted_final_value: self.inflation_adjusted_final_value,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_periods: u32,
    pub total_contributed: f64,
    pub final_value: f64,
    pub total_gains: f64,
    /// Final value per unit contributed
    pub growth_multiple: f64,
    /// Annualized IRR of the contribution stream, in percent
    pub money_weighted_return_pct: Option<f64>,
    pub max_drawdown_pct: f64,
    pub recovery_periods: Option<u32>,
    pub inflation_adjusted_final_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_milestone_overwrites_same_year() {
        let mut result = SimulationResult::new(10.0, 12);
        result.add_milestone(1.0, 120.0);
        result.add_milestone(2.0, 250.0);
        result.add_milestone(2.0, 251.0);

        assert_eq!(result.milestones.len(), 2);
        assert_eq!(result.milestone(2.0), Some(251.0));
        assert_eq!(result.milestone(3.0), None);
    }

    #[test]
    fn test_summary_of_empty_result() {
        let summary = SimulationResult::new(100.0, 52).summary();

        assert_eq!(summary.total_periods, 0);
        assert_eq!(summary.growth_multiple, 0.0);
        assert_eq!(summary.money_weighted_return_pct, None);
    }
}
