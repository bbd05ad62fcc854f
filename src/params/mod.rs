//! Parameter normalization
//!
//! Turns a loosely-typed bundle of named inputs into a [`SimulationConfig`]
//! the projection engine can trust. Nothing here fails: unreadable values fall
//! back to the field default and everything is clamped into range.

mod presets;

pub use presets::{find_preset, load_presets, load_presets_from_reader, Preset};

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single raw input value: a number, or text that may parse as one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Interpret as a finite number, if possible
    pub fn as_finite(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<u32> for RawValue {
    fn from(value: u32) -> Self {
        RawValue::Number(f64::from(value))
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// Raw parameter bundle as supplied by a caller (command layer, JSON request, CLI)
///
/// Every field is optional. This is also the value a caller keeps as the
/// "current configuration" of a session and merges updates into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawParams {
    pub periodic_amount: Option<RawValue>,
    pub horizon_years: Option<RawValue>,
    pub annual_return_pct: Option<RawValue>,
    pub annual_fee_pct: Option<RawValue>,
    pub shock_pct: Option<RawValue>,
    pub shock_year: Option<RawValue>,
    pub periods_per_year: Option<RawValue>,
    pub inflation_pct: Option<RawValue>,
}

impl RawParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amount(mut self, value: impl Into<RawValue>) -> Self {
        self.periodic_amount = Some(value.into());
        self
    }

    pub fn with_years(mut self, value: impl Into<RawValue>) -> Self {
        self.horizon_years = Some(value.into());
        self
    }

    pub fn with_return(mut self, value: impl Into<RawValue>) -> Self {
        self.annual_return_pct = Some(value.into());
        self
    }

    pub fn with_fee(mut self, value: impl Into<RawValue>) -> Self {
        self.annual_fee_pct = Some(value.into());
        self
    }

    pub fn with_shock(mut self, pct: impl Into<RawValue>, at_year: impl Into<RawValue>) -> Self {
        self.shock_pct = Some(pct.into());
        self.shock_year = Some(at_year.into());
        self
    }

    pub fn with_periods_per_year(mut self, value: impl Into<RawValue>) -> Self {
        self.periods_per_year = Some(value.into());
        self
    }

    pub fn with_inflation(mut self, value: impl Into<RawValue>) -> Self {
        self.inflation_pct = Some(value.into());
        self
    }

    /// Overlay another bundle on top of this one; fields present in `overlay` win
    pub fn merge(&self, overlay: &RawParams) -> RawParams {
        fn pick(base: &Option<RawValue>, over: &Option<RawValue>) -> Option<RawValue> {
            over.clone().or_else(|| base.clone())
        }

        RawParams {
            periodic_amount: pick(&self.periodic_amount, &overlay.periodic_amount),
            horizon_years: pick(&self.horizon_years, &overlay.horizon_years),
            annual_return_pct: pick(&self.annual_return_pct, &overlay.annual_return_pct),
            annual_fee_pct: pick(&self.annual_fee_pct, &overlay.annual_fee_pct),
            shock_pct: pick(&self.shock_pct, &overlay.shock_pct),
            shock_year: pick(&self.shock_year, &overlay.shock_year),
            periods_per_year: pick(&self.periods_per_year, &overlay.periods_per_year),
            inflation_pct: pick(&self.inflation_pct, &overlay.inflation_pct),
        }
    }

    /// Normalize into a clamped configuration
    pub fn normalize(&self) -> SimulationConfig {
        normalize(self)
    }
}

/// Default value and clamp range for one numeric field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub default: f64,
    pub min: f64,
    pub max: f64,
}

impl FieldBounds {
    const fn new(default: f64, min: f64, max: f64) -> Self {
        Self { default, min, max }
    }

    /// Resolve a raw input: default when unreadable, then clamp
    pub fn resolve(&self, field: &str, raw: Option<&RawValue>) -> f64 {
        let value = match raw.and_then(RawValue::as_finite) {
            Some(v) => v,
            None => {
                if let Some(raw) = raw {
                    debug!("{}: unreadable input {:?}, using default {}", field, raw, self.default);
                }
                self.default
            }
        };

        let clamped = value.clamp(self.min, self.max);
        if clamped != value {
            debug!("{}: {} clamped to {}", field, value, clamped);
        }
        clamped
    }
}

pub const PERIODIC_AMOUNT: FieldBounds = FieldBounds::new(100.0, 0.0, 1_000_000_000.0);
pub const HORIZON_YEARS: FieldBounds = FieldBounds::new(10.0, 0.0, 50.0);
pub const ANNUAL_RETURN_PCT: FieldBounds = FieldBounds::new(7.0, -100.0, 200.0);
pub const ANNUAL_FEE_PCT: FieldBounds = FieldBounds::new(0.0, 0.0, 5.0);
pub const PERIODS_PER_YEAR: FieldBounds = FieldBounds::new(52.0, 1.0, 52.0);
pub const INFLATION_PCT: FieldBounds = FieldBounds::new(2.0, 0.0, 50.0);

/// Allowed range for a shock's percentage drop
pub const SHOCK_PCT_MIN: f64 = -95.0;
pub const SHOCK_PCT_MAX: f64 = 0.0;

/// A single one-time value shock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShockConfig {
    /// Percentage change applied once, in `[-95, 0]`
    pub pct_drop: f64,
    /// Year at which the shock hits, in `[0, horizon_years]`
    pub at_year: f64,
}

/// Normalized simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Contribution added at the start of each period
    pub periodic_amount: f64,
    pub horizon_years: f64,
    pub annual_return_pct: f64,
    pub annual_fee_pct: f64,
    pub shock: Option<ShockConfig>,
    pub periods_per_year: u32,
    /// Only used for the inflation-adjusted final value
    pub inflation_pct: f64,
}

impl SimulationConfig {
    /// Number of periods the engine will run
    pub fn total_periods(&self) -> u32 {
        (self.horizon_years * f64::from(self.periods_per_year)).floor() as u32
    }

    /// Same configuration with the shock removed
    pub fn without_shock(&self) -> Self {
        Self { shock: None, ..self.clone() }
    }

    /// Same configuration with the fee removed
    pub fn without_fee(&self) -> Self {
        Self { annual_fee_pct: 0.0, ..self.clone() }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        normalize(&RawParams::default())
    }
}

/// Validate and clamp a raw parameter bundle. Never fails.
pub fn normalize(raw: &RawParams) -> SimulationConfig {
    let periodic_amount = PERIODIC_AMOUNT.resolve("periodic_amount", raw.periodic_amount.as_ref());
    let horizon_years = HORIZON_YEARS.resolve("horizon_years", raw.horizon_years.as_ref());
    let annual_return_pct =
        ANNUAL_RETURN_PCT.resolve("annual_return_pct", raw.annual_return_pct.as_ref());
    let annual_fee_pct = ANNUAL_FEE_PCT.resolve("annual_fee_pct", raw.annual_fee_pct.as_ref());
    let inflation_pct = INFLATION_PCT.resolve("inflation_pct", raw.inflation_pct.as_ref());

    // Bounds are whole numbers, so rounding after the clamp stays in range
    let periods_per_year = PERIODS_PER_YEAR
        .resolve("periods_per_year", raw.periods_per_year.as_ref())
        .round() as u32;

    let shock = normalize_shock(raw, horizon_years);

    SimulationConfig {
        periodic_amount,
        horizon_years,
        annual_return_pct,
        annual_fee_pct,
        shock,
        periods_per_year,
        inflation_pct,
    }
}

/// Both shock parts must be readable, otherwise the shock is dropped
fn normalize_shock(raw: &RawParams, horizon_years: f64) -> Option<ShockConfig> {
    let pct = raw.shock_pct.as_ref().and_then(RawValue::as_finite);
    let year = raw.shock_year.as_ref().and_then(RawValue::as_finite);

    match (pct, year) {
        (Some(pct), Some(year)) => Some(ShockConfig {
            pct_drop: pct.clamp(SHOCK_PCT_MIN, SHOCK_PCT_MAX),
            at_year: year.clamp(0.0, horizon_years),
        }),
        (None, None) => None,
        _ => {
            debug!("incomplete shock (pct {:?}, year {:?}) ignored", pct, year);
            None
        }
    }
}

/// Common contribution frequencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodFrequency {
    Weekly,
    Monthly,
    Quarterly,
    Annual,
}

impl PeriodFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            PeriodFrequency::Weekly => 52,
            PeriodFrequency::Monthly => 12,
            PeriodFrequency::Quarterly => 4,
            PeriodFrequency::Annual => 1,
        }
    }
}

impl FromStr for PeriodFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" | "w" => Ok(PeriodFrequency::Weekly),
            "monthly" | "month" | "m" => Ok(PeriodFrequency::Monthly),
            "quarterly" | "quarter" | "q" => Ok(PeriodFrequency::Quarterly),
            "annual" | "annually" | "yearly" | "y" => Ok(PeriodFrequency::Annual),
            other => Err(format!("Unknown frequency: {}", other)),
        }
    }
}

impl fmt::Display for PeriodFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PeriodFrequency::Weekly => "weekly",
            PeriodFrequency::Monthly => "monthly",
            PeriodFrequency::Quarterly => "quarterly",
            PeriodFrequency::Annual => "annual",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bundle_uses_defaults() {
        let config = normalize(&RawParams::new());

        assert_eq!(config.periodic_amount, 100.0);
        assert_eq!(config.horizon_years, 10.0);
        assert_eq!(config.annual_return_pct, 7.0);
        assert_eq!(config.annual_fee_pct, 0.0);
        assert_eq!(config.periods_per_year, 52);
        assert_eq!(config.inflation_pct, 2.0);
        assert!(config.shock.is_none());
    }

    #[test]
    fn test_unreadable_values_fall_back_to_default() {
        let raw = RawParams::new()
            .with_amount("lots")
            .with_years(f64::NAN)
            .with_return(f64::INFINITY)
            .with_fee("");

        let config = normalize(&raw);
        assert_eq!(config.periodic_amount, PERIODIC_AMOUNT.default);
        assert_eq!(config.horizon_years, HORIZON_YEARS.default);
        assert_eq!(config.annual_return_pct, ANNUAL_RETURN_PCT.default);
        assert_eq!(config.annual_fee_pct, ANNUAL_FEE_PCT.default);
    }

    #[test]
    fn test_text_numbers_are_accepted() {
        let raw = RawParams::new().with_amount(" 250.5 ").with_years("3");
        let config = normalize(&raw);

        assert_eq!(config.periodic_amount, 250.5);
        assert_eq!(config.horizon_years, 3.0);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let raw = RawParams::new()
            .with_amount(-50.0)
            .with_years(80.0)
            .with_return(-150.0)
            .with_fee(12.0)
            .with_periods_per_year(365u32)
            .with_inflation(-3.0);

        let config = normalize(&raw);
        assert_eq!(config.periodic_amount, 0.0);
        assert_eq!(config.horizon_years, 50.0);
        assert_eq!(config.annual_return_pct, -100.0);
        assert_eq!(config.annual_fee_pct, 5.0);
        assert_eq!(config.periods_per_year, 52);
        assert_eq!(config.inflation_pct, 0.0);

        let high = normalize(&RawParams::new().with_return(500.0));
        assert_eq!(high.annual_return_pct, 200.0);
    }

    #[test]
    fn test_periods_per_year_rounded() {
        let config = normalize(&RawParams::new().with_periods_per_year(11.6));
        assert_eq!(config.periods_per_year, 12);

        let config = normalize(&RawParams::new().with_periods_per_year(0.2));
        assert_eq!(config.periods_per_year, 1);
    }

    #[test]
    fn test_shock_year_clamped_to_clamped_horizon() {
        let raw = RawParams::new().with_years(70.0).with_shock(-30.0, 65.0);
        let config = normalize(&raw);

        assert_eq!(config.horizon_years, 50.0);
        let shock = config.shock.expect("shock should be present");
        assert_eq!(shock.at_year, 50.0);
        assert_eq!(shock.pct_drop, -30.0);

        let raw = RawParams::new().with_years(5.0).with_shock(-20.0, 9.0);
        assert_eq!(normalize(&raw).shock.unwrap().at_year, 5.0);
    }

    #[test]
    fn test_shock_pct_clamped() {
        let deep = normalize(&RawParams::new().with_shock(-99.0, 2.0));
        assert_eq!(deep.shock.unwrap().pct_drop, -95.0);

        let positive = normalize(&RawParams::new().with_shock(20.0, 2.0));
        assert_eq!(positive.shock.unwrap().pct_drop, 0.0);

        let early = normalize(&RawParams::new().with_shock(-10.0, -4.0));
        assert_eq!(early.shock.unwrap().at_year, 0.0);
    }

    #[test]
    fn test_partial_shock_is_dropped() {
        let mut raw = RawParams::new();
        raw.shock_pct = Some(RawValue::from(-30.0));
        assert!(normalize(&raw).shock.is_none());

        let mut raw = RawParams::new();
        raw.shock_year = Some(RawValue::from(3.0));
        assert!(normalize(&raw).shock.is_none());

        let raw = RawParams::new().with_shock(-30.0, "soon");
        assert!(normalize(&raw).shock.is_none());
    }

    #[test]
    fn test_merge_prefers_overlay() {
        let current = RawParams::new().with_amount(50.0).with_return(5.0).with_shock(-20.0, 2.0);
        let overlay = RawParams::new().with_return(9.0).with_fee(0.3);

        let merged = current.merge(&overlay);
        assert_eq!(merged.periodic_amount, Some(RawValue::from(50.0)));
        assert_eq!(merged.annual_return_pct, Some(RawValue::from(9.0)));
        assert_eq!(merged.annual_fee_pct, Some(RawValue::from(0.3)));
        assert_eq!(merged.shock_pct, Some(RawValue::from(-20.0)));
    }

    #[test]
    fn test_raw_params_from_json() {
        let json = r#"{"periodic_amount": "100", "horizon_years": 5, "shock_pct": null, "shock_year": 2}"#;
        let raw: RawParams = serde_json::from_str(json).unwrap();

        let config = normalize(&raw);
        assert_eq!(config.periodic_amount, 100.0);
        assert_eq!(config.horizon_years, 5.0);
        assert!(config.shock.is_none());
    }

    #[test]
    fn test_total_periods() {
        let config = normalize(&RawParams::new().with_years(2.5).with_periods_per_year(12u32));
        assert_eq!(config.total_periods(), 30);

        let config = normalize(&RawParams::new().with_years(0.0));
        assert_eq!(config.total_periods(), 0);
    }

    #[test]
    fn test_frequency_parsing() {
        assert_eq!("Weekly".parse::<PeriodFrequency>(), Ok(PeriodFrequency::Weekly));
        assert_eq!("m".parse::<PeriodFrequency>(), Ok(PeriodFrequency::Monthly));
        assert_eq!(PeriodFrequency::Quarterly.periods_per_year(), 4);
        assert!("fortnightly".parse::<PeriodFrequency>().is_err());
    }
}
