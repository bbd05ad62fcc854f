//! Running state of a single projection

/// State carried from one period to the next
#[derive(Debug, Clone, Default)]
pub struct ProjectionState {
    /// Current period (1-indexed, 0 before the first period)
    pub period: u32,

    /// Portfolio value at the end of the last completed step
    pub value: f64,

    /// Cumulative contributions
    pub contributed: f64,

    /// Highest value seen so far (0 until the first period completes)
    pub peak: f64,

    /// Most negative drawdown seen so far, as a fraction (<= 0)
    pub min_drawdown: f64,

    /// Period the shock fired in, once it has
    pub shock_period: Option<u32>,

    /// Pre-shock peak the value has to climb back to
    pub recovery_target: Option<f64>,

    /// Periods counted since the shock, including the shock period
    pub recovery_counter: u32,

    /// Set once the value reaches the recovery target
    pub recovery_periods: Option<u32>,
}

impl ProjectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to next period
    pub fn advance_period(&mut self) {
        self.period += 1;
    }

    /// Add a contribution at the start of the period
    pub fn contribute(&mut self, amount: f64) {
        self.value += amount;
        self.contributed += amount;
    }

    /// Apply the shock and remember what recovery means
    ///
    /// The target is the running peak, or the current value when no peak
    /// has been recorded yet.
    pub fn apply_shock(&mut self, pct_drop: f64) {
        self.value *= 1.0 + pct_drop / 100.0;
        self.shock_period = Some(self.period);
        self.recovery_target = Some(if self.peak > 0.0 { self.peak } else { self.value });
    }

    /// Update peak and drawdown after this period's value is final
    pub fn update_peak_and_drawdown(&mut self) {
        if self.value > self.peak {
            self.peak = self.value;
        }
        if self.peak > 0.0 {
            let drawdown = (self.value - self.peak) / self.peak;
            if drawdown < self.min_drawdown {
                self.min_drawdown = drawdown;
            }
        }
    }

    /// Count one more period since the shock and check for recovery
    pub fn track_recovery(&mut self) {
        let Some(target) = self.recovery_target else {
            return;
        };
        if self.recovery_periods.is_some() {
            return;
        }

        self.recovery_counter += 1;
        if self.value >= target {
            self.recovery_periods = Some(self.recovery_counter);
        }
    }

    /// Drawdown from the running peak, as a fraction
    pub fn current_drawdown(&self) -> f64 {
        if self.peak <= 0.0 {
            0.0
        } else {
            (self.value - self.peak) / self.peak
        }
    }
}
