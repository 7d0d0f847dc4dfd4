use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::{ActingUser, ApiError, ApiResult, AppState};
use crate::models::{Roadmap, RoadmapInput};

pub async fn list_roadmaps(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> ApiResult<Json<Vec<Roadmap>>> {
    Ok(Json(state.db.list_roadmaps(user.id)?))
}

pub async fn create_roadmap(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Json(input): Json<RoadmapInput>,
) -> ApiResult<(StatusCode, Json<Roadmap>)> {
    let fields = input.validate()?;
    let roadmap = state.db.create_roadmap(user.id, &fields)?;
    tracing::info!(roadmap_id = %roadmap.id, user_id = %user.id, "Created roadmap");
    Ok((StatusCode::CREATED, Json(roadmap)))
}

pub async fn get_roadmap(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Roadmap>> {
    state
        .db
        .get_roadmap(user.id, id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Roadmap", id))
}

pub async fn update_roadmap(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
    Json(input): Json<RoadmapInput>,
) -> ApiResult<Json<Roadmap>> {
    let fields = input.validate()?;
    if !state.db.update_roadmap(user.id, id, &fields)? {
        return Err(ApiError::not_found("Roadmap", id));
    }
    state
        .db
        .get_roadmap(user.id, id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Roadmap", id))
}

pub async fn delete_roadmap(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state.db.delete_roadmap(user.id, id)? {
        return Err(ApiError::not_found("Roadmap", id));
    }
    Ok(StatusCode::NO_CONTENT)
}
