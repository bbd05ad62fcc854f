//! DCA projection - deterministic projection engine for periodic fixed-amount investing
//!
//! This library provides:
//! - Parameter normalization (defaults and clamping, never fails)
//! - Period-by-period projection with growth, fees and a single market shock
//! - Drawdown, shock recovery, milestone and inflation-adjusted analytics
//! - Fund presets and scenario comparisons

pub mod error;
pub mod params;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{DcaError, Result};
pub use params::{normalize, PeriodFrequency, Preset, RawParams, RawValue, ShockConfig, SimulationConfig};
pub use projection::{project, Milestone, ProjectionEngine, ProjectionSummary, SimulationResult};
pub use scenario::{ImpactReport, ScenarioRunner};
