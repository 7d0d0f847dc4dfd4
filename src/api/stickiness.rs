use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::{ActingUser, ApiError, ApiResult, AppState};
use crate::metrics::{self, MetricAnalysis};
use crate::models::{StickinessInput, StickinessRecord};

pub async fn list_stickiness(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> ApiResult<Json<Vec<StickinessRecord>>> {
    Ok(Json(state.db.list_stickiness(user.id)?))
}

pub async fn create_stickiness(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Json(input): Json<StickinessInput>,
) -> ApiResult<(StatusCode, Json<StickinessRecord>)> {
    let fields = input.validate()?;
    let record = state.db.create_stickiness(user.id, &fields)?;
    tracing::info!(snapshot_id = %record.id, user_id = %user.id, "Created stickiness snapshot");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_stickiness(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<StickinessRecord>> {
    state
        .db
        .get_stickiness(user.id, id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Stickiness snapshot", id))
}

pub async fn update_stickiness(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
    Json(input): Json<StickinessInput>,
) -> ApiResult<Json<StickinessRecord>> {
    let fields = input.validate()?;
    if !state.db.update_stickiness(user.id, id, &fields)? {
        return Err(ApiError::not_found("Stickiness snapshot", id));
    }
    state
        .db
        .get_stickiness(user.id, id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Stickiness snapshot", id))
}

pub async fn delete_stickiness(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state.db.delete_stickiness(user.id, id)? {
        return Err(ApiError::not_found("Stickiness snapshot", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn stickiness_analysis(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> ApiResult<Json<MetricAnalysis>> {
    let snapshots = state.db.list_stickiness(user.id)?;
    Ok(Json(metrics::analyze_stickiness(&snapshots)))
}
