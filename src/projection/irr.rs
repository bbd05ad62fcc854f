//! Internal Rate of Return (IRR) calculation
//!
//! Used to express a projection as a single money-weighted annual return

use super::result::SimulationResult;

/// Calculate the Internal Rate of Return (IRR) for a series of cash flows
/// using the Newton-Raphson method.
///
/// # Arguments
/// * `cashflows` - Cash flows per period (positive = inflow, negative = outflow)
/// * `periods_per_year` - Number of periods per year (52 for weekly)
///
/// # Returns
/// * `Option<f64>` - Annual IRR as a decimal (e.g., 0.05 for 5%), or None if no solution found
pub fn calculate_irr(cashflows: &[f64], periods_per_year: u32) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }

    if cashflows.iter().all(|&cf| cf.abs() < 1e-10) {
        return Some(0.0);
    }

    // At least one sign change is required for an IRR to exist
    let has_positive = cashflows.iter().any(|&cf| cf > 1e-10);
    let has_negative = cashflows.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return None;
    }

    let mut rate = 0.05 / f64::from(periods_per_year);
    let tolerance = 1e-12;
    let max_iterations = 1000;

    for _ in 0..max_iterations {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if !npv.is_finite() || !dnpv.is_finite() || dnpv.abs() < 1e-20 {
            return calculate_irr_bisection(cashflows, periods_per_year);
        }

        let new_rate = (rate - npv / dnpv).clamp(-0.5, 1.0);

        if (new_rate - rate).abs() < tolerance {
            return Some(annualize(new_rate, periods_per_year));
        }

        rate = new_rate;
    }

    calculate_irr_bisection(cashflows, periods_per_year)
}

/// Money-weighted annual return of a projection
///
/// Contributions go in at the start of each period (t = 0..N-1) and the
/// final value comes out at the end of period N.
pub fn money_weighted_return(result: &SimulationResult) -> Option<f64> {
    let periods = result.series.len();
    if periods == 0 || result.periodic_amount <= 0.0 {
        return None;
    }

    let mut cashflows = vec![-result.periodic_amount; periods];
    cashflows.push(result.final_value);

    calculate_irr(&cashflows, result.periods_per_year)
}

fn annualize(periodic_rate: f64, periods_per_year: u32) -> f64 {
    (1.0 + periodic_rate).powi(periods_per_year as i32) - 1.0
}

/// Calculate NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / (discount * (1.0 + rate));
        }
    }

    (npv, dnpv)
}

/// Fallback IRR calculation using bisection method
fn calculate_irr_bisection(cashflows: &[f64], periods_per_year: u32) -> Option<f64> {
    let mut low = -0.5_f64;
    let mut high = 1.0_f64;
    let tolerance = 1e-12;
    let max_iterations = 1000;

    let mut npv_low = npv_at_rate(cashflows, low);
    let npv_high = npv_at_rate(cashflows, high);

    if !npv_low.is_finite() || !npv_high.is_finite() || npv_low * npv_high > 0.0 {
        return None;
    }

    for _ in 0..max_iterations {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at_rate(cashflows, mid);

        if npv_mid.abs() < tolerance || (high - low) / 2.0 < tolerance {
            return Some(annualize(mid, periods_per_year));
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}

/// Calculate NPV at a given periodic rate
fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simple_irr() {
        // Investment of $1000, returns $1100 after 1 year (monthly)
        let mut cashflows = vec![-1000.0];
        cashflows.extend(vec![0.0; 11]);
        cashflows.push(1100.0);

        let irr = calculate_irr(&cashflows, 12).unwrap();
        assert!((irr - 0.10).abs() < 0.001, "Expected ~10% IRR, got {}", irr);
    }

    #[test]
    fn test_no_sign_change() {
        assert_eq!(calculate_irr(&[-100.0, -50.0], 12), None);
        assert_eq!(calculate_irr(&[], 12), None);
        assert_eq!(calculate_irr(&[0.0, 0.0], 12), Some(0.0));
    }

    #[test]
    fn test_money_weighted_return_matches_constant_growth() {
        // Every contribution earns the same rate, so the IRR is that rate
        let rate = (1.07_f64).powf(1.0 / 12.0) - 1.0;
        let mut result = SimulationResult::new(100.0, 12);
        let mut value = 0.0;
        for _ in 0..60 {
            value = (value + 100.0) * (1.0 + rate);
            result.series.push(value);
        }
        result.final_value = value;

        let mwr = money_weighted_return(&result).unwrap();
        assert_relative_eq!(mwr, 0.07, epsilon = 1e-6);
    }

    #[test]
    fn test_money_weighted_return_undefined_without_contributions() {
        let mut result = SimulationResult::new(0.0, 52);
        result.series = vec![0.0; 10];
        assert_eq!(money_weighted_return(&result), None);
    }
}
