use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::{ActingUser, ApiError, ApiResult, AppState};
use crate::metrics::{self, MetricAnalysis};
use crate::models::{CohortInput, CohortRecord};

pub async fn list_cohorts(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> ApiResult<Json<Vec<CohortRecord>>> {
    Ok(Json(state.db.list_cohorts(user.id)?))
}

pub async fn create_cohort(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Json(input): Json<CohortInput>,
) -> ApiResult<(StatusCode, Json<CohortRecord>)> {
    let fields = input.validate()?;
    let record = state.db.create_cohort(user.id, &fields)?;
    tracing::info!(cohort_id = %record.id, user_id = %user.id, "Created cohort");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_cohort(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CohortRecord>> {
    state
        .db
        .get_cohort(user.id, id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Cohort", id))
}

pub async fn update_cohort(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
    Json(input): Json<CohortInput>,
) -> ApiResult<Json<CohortRecord>> {
    let fields = input.validate()?;
    if !state.db.update_cohort(user.id, id, &fields)? {
        return Err(ApiError::not_found("Cohort", id));
    }
    state
        .db
        .get_cohort(user.id, id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Cohort", id))
}

pub async fn delete_cohort(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state.db.delete_cohort(user.id, id)? {
        return Err(ApiError::not_found("Cohort", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn cohort_analysis(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> ApiResult<Json<MetricAnalysis>> {
    let cohorts = state.db.list_cohorts(user.id)?;
    Ok(Json(metrics::analyze_cohorts(&cohorts)))
}
