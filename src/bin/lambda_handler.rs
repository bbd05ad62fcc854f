//! AWS Lambda handler for running a single projection
//!
//! Accepts a JSON parameter bundle (every field optional, numbers or numeric
//! strings) plus an optional preset id, and returns the normalized config,
//! the projection result and its summary.

use dca_projection::params::find_preset;
use dca_projection::{normalize, project, Preset, ProjectionSummary, RawParams, SimulationConfig, SimulationResult};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

/// Input for the projection
#[derive(Debug, Deserialize)]
pub struct ProjectionRequest {
    #[serde(flatten)]
    pub params: RawParams,

    /// Built-in preset supplying return and fee; explicit fields win
    #[serde(default)]
    pub preset: Option<String>,

    /// Whether to return the per-period series (default: true)
    #[serde(default = "default_true")]
    pub include_series: bool,
}

fn default_true() -> bool { true }

/// Output from the projection
#[derive(Debug, Serialize)]
pub struct ProjectionResponse {
    pub config: SimulationConfig,
    pub result: SimulationResult,
    pub summary: ProjectionSummary,
    pub execution_time_ms: u64,
}

async fn handler(event: LambdaEvent<ProjectionRequest>) -> Result<ProjectionResponse, Error> {
    let start = std::time::Instant::now();
    let request = event.payload;

    let raw = match &request.preset {
        Some(id) => {
            let presets = Preset::builtin();
            find_preset(&presets, id)?.apply(&RawParams::default()).merge(&request.params)
        }
        None => request.params,
    };

    let config = normalize(&raw);
    let mut result = project(&config);
    let summary = result.summary();

    if !request.include_series {
        result.series.clear();
    }

    log::info!(
        "projected {} periods, final value {:.2}",
        summary.total_periods, summary.final_value
    );

    Ok(ProjectionResponse {
        config,
        result,
        summary,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
