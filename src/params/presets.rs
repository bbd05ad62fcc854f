//! Named fund presets
//!
//! A preset is a fixed return/fee fragment merged over the caller's current
//! parameters. Presets can come from the built-in table or a CSV file.

use super::{RawParams, RawValue};
use crate::error::{DcaError, Result};
use csv::Reader;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Expected return and running cost of a broad fund
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub annual_return_pct: f64,
    pub annual_fee_pct: f64,
}

impl Preset {
    pub fn new(id: &str, name: &str, annual_return_pct: f64, annual_fee_pct: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            annual_return_pct,
            annual_fee_pct,
        }
    }

    /// Built-in table of long-run index fund assumptions
    pub fn builtin() -> Vec<Preset> {
        vec![
            Preset::new("msci-world", "MSCI World", 7.0, 0.20),
            Preset::new("sp500", "S&P 500", 8.0, 0.07),
            Preset::new("all-world", "FTSE All-World", 6.8, 0.22),
            Preset::new("em", "MSCI Emerging Markets", 6.0, 0.18),
            Preset::new("bonds", "Global Aggregate Bonds", 2.5, 0.10),
        ]
    }

    /// Merge this preset's return and fee over the current parameters
    pub fn apply(&self, current: &RawParams) -> RawParams {
        let fragment = RawParams {
            annual_return_pct: Some(RawValue::Number(self.annual_return_pct)),
            annual_fee_pct: Some(RawValue::Number(self.annual_fee_pct)),
            ..RawParams::default()
        };
        current.merge(&fragment)
    }
}

/// Case-insensitive lookup by id
pub fn find_preset<'a>(presets: &'a [Preset], id: &str) -> Result<&'a Preset> {
    presets
        .iter()
        .find(|p| p.id.eq_ignore_ascii_case(id.trim()))
        .ok_or_else(|| DcaError::UnknownPreset(id.to_string()))
}

/// Raw CSV row: id,name,annual_return_pct,annual_fee_pct
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    name: String,
    annual_return_pct: f64,
    annual_fee_pct: f64,
}

impl CsvRow {
    fn to_preset(self, row: usize) -> Result<Preset> {
        if self.id.trim().is_empty() {
            return Err(DcaError::InvalidPreset { row, message: "empty id".into() });
        }
        if !self.annual_return_pct.is_finite() || !self.annual_fee_pct.is_finite() {
            return Err(DcaError::InvalidPreset { row, message: "non-finite rate".into() });
        }

        Ok(Preset {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            annual_return_pct: self.annual_return_pct,
            annual_fee_pct: self.annual_fee_pct,
        })
    }
}

/// Load presets from a CSV file
pub fn load_presets<P: AsRef<Path>>(path: P) -> Result<Vec<Preset>> {
    let reader = Reader::from_path(path)?;
    collect_presets(reader)
}

/// Load presets from any reader (e.g., string buffer, network stream)
pub fn load_presets_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Preset>> {
    collect_presets(Reader::from_reader(reader))
}

fn collect_presets<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<Preset>> {
    let mut presets = Vec::new();

    for (idx, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        // Header is line 1
        presets.push(row.to_preset(idx + 2)?);
    }

    Ok(presets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::normalize;

    #[test]
    fn test_builtin_lookup() {
        let presets = Preset::builtin();
        let sp = find_preset(&presets, "SP500").unwrap();
        assert_eq!(sp.annual_fee_pct, 0.07);

        assert!(matches!(
            find_preset(&presets, "gold"),
            Err(DcaError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_apply_keeps_other_fields() {
        let current = RawParams::new().with_amount(25.0).with_years(20.0).with_return(3.0);
        let preset = Preset::new("x", "X", 9.0, 0.5);

        let config = normalize(&preset.apply(&current));
        assert_eq!(config.periodic_amount, 25.0);
        assert_eq!(config.horizon_years, 20.0);
        assert_eq!(config.annual_return_pct, 9.0);
        assert_eq!(config.annual_fee_pct, 0.5);
    }

    #[test]
    fn test_load_from_reader() {
        let data = "id,name,annual_return_pct,annual_fee_pct\n\
                    world,World ETF,7.1,0.2\n\
                    tech, Tech ETF ,10,0.35\n";
        let presets = load_presets_from_reader(data.as_bytes()).unwrap();

        assert_eq!(presets.len(), 2);
        assert_eq!(presets[1].name, "Tech ETF");
        assert_eq!(presets[1].annual_return_pct, 10.0);
    }

    #[test]
    fn test_load_bundled_presets() {
        let presets = load_presets("data/presets.csv").expect("Failed to load presets");
        assert_eq!(presets.len(), 6);

        let small = find_preset(&presets, "small-cap").unwrap();
        assert_eq!(small.annual_fee_pct, 0.35);
    }

    #[test]
    fn test_load_rejects_bad_rows() {
        let data = "id,name,annual_return_pct,annual_fee_pct\nworld,World,abc,0.2\n";
        assert!(matches!(
            load_presets_from_reader(data.as_bytes()),
            Err(DcaError::Csv(_))
        ));

        let data = "id,name,annual_return_pct,annual_fee_pct\n ,Blank,5,0.2\n";
        assert!(matches!(
            load_presets_from_reader(data.as_bytes()),
            Err(DcaError::InvalidPreset { row: 2, .. })
        ));
    }
}
