use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::{ApiError, ApiResult, AppState};
use crate::simulation::{find_scenario, Scenario, SimulationRun, SCENARIOS};

#[derive(Debug, Deserialize)]
pub struct StartRunInput {
    pub scenario: String,
}

pub async fn list_scenarios() -> Json<&'static [Scenario]> {
    Json(SCENARIOS)
}

pub async fn list_runs(State(state): State<AppState>) -> Json<Vec<SimulationRun>> {
    Json(state.simulations.list().await)
}

pub async fn start_run(
    State(state): State<AppState>,
    Json(input): Json<StartRunInput>,
) -> ApiResult<(StatusCode, Json<SimulationRun>)> {
    let scenario = find_scenario(&input.scenario)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown scenario '{}'", input.scenario)))?;
    let run = state.simulations.start(scenario).await;
    Ok((StatusCode::ACCEPTED, Json(run)))
}

pub async fn get_run(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SimulationRun>> {
    state
        .simulations
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Simulation run", id))
}
