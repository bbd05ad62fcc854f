//! Projection engine for periodic contribution projections

mod state;
mod engine;
mod result;
pub mod rates;
pub mod irr;

pub use state::ProjectionState;
pub use engine::{project, shock_period, ProjectionEngine};
pub use result::{Milestone, ProjectionSummary, SimulationResult};
pub use irr::{calculate_irr, money_weighted_return};
