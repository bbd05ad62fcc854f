//! Annual to per-period rate conversions

/// Per-period growth rate equivalent to an annual return (in percent)
///
/// Standard compounding: r_period = (1 + r_annual)^(1/n) - 1.
/// Annual returns at or below -100% are a total wipeout: exactly -1.
pub fn period_growth_rate(annual_return_pct: f64, periods_per_year: u32) -> f64 {
    if annual_return_pct <= -100.0 {
        return -1.0;
    }
    (1.0 + annual_return_pct / 100.0).powf(1.0 / f64::from(periods_per_year.max(1))) - 1.0
}

/// Per-period multiplier left after an annual fee (in percent)
///
/// The fee is a decay: f_period = (1 - f_annual)^(1/n).
pub fn period_fee_factor(annual_fee_pct: f64, periods_per_year: u32) -> f64 {
    if annual_fee_pct <= 0.0 {
        return 1.0;
    }
    if annual_fee_pct >= 100.0 {
        return 0.0;
    }
    (1.0 - annual_fee_pct / 100.0).powf(1.0 / f64::from(periods_per_year.max(1)))
}

/// Price level after `years` of constant inflation (in percent)
pub fn inflation_deflator(inflation_pct: f64, years: f64) -> f64 {
    (1.0 + inflation_pct / 100.0).powf(years)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_growth_compounds_back_to_annual() {
        let weekly = period_growth_rate(7.0, 52);
        assert_relative_eq!((1.0 + weekly).powi(52), 1.07, epsilon = 1e-12);

        let monthly = period_growth_rate(-20.0, 12);
        assert_relative_eq!((1.0 + monthly).powi(12), 0.80, epsilon = 1e-12);
    }

    #[test]
    fn test_growth_floor_at_total_loss() {
        assert_eq!(period_growth_rate(-100.0, 52), -1.0);
        assert_eq!(period_growth_rate(-140.0, 12), -1.0);
        assert_eq!(period_growth_rate(0.0, 52), 0.0);
    }

    #[test]
    fn test_fee_factor_edges() {
        assert_eq!(period_fee_factor(0.0, 52), 1.0);
        assert_eq!(period_fee_factor(100.0, 52), 0.0);
        assert_eq!(period_fee_factor(250.0, 12), 0.0);

        let factor = period_fee_factor(1.0, 12);
        assert!(factor < 1.0);
        assert_relative_eq!(factor.powi(12), 0.99, epsilon = 1e-12);
    }

    #[test]
    fn test_inflation_deflator() {
        assert_eq!(inflation_deflator(2.0, 0.0), 1.0);
        assert_relative_eq!(inflation_deflator(2.0, 10.0), 1.02f64.powi(10), epsilon = 1e-12);
    }
}
