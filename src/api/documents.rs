//! Handlers shared by every wide free-text document (PRD, UAT form).

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::{ActingUser, ApiError, ApiResult, AppState};
use crate::export::{export_document, ExportFormat};
use crate::models::{DocumentRecord, FlatDocument};

pub async fn list_documents<T: FlatDocument>(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> ApiResult<Json<Vec<DocumentRecord<T>>>> {
    Ok(Json(state.db.list_documents::<T>(user.id)?))
}

pub async fn create_document<T: FlatDocument>(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Json(body): Json<T>,
) -> ApiResult<(StatusCode, Json<DocumentRecord<T>>)> {
    body.validate()?;
    let record = state.db.create_document(user.id, &body)?;
    tracing::info!(table = T::TABLE, id = %record.id, user_id = %user.id, "Created document");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_document<T: FlatDocument>(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DocumentRecord<T>>> {
    state
        .db
        .get_document::<T>(user.id, id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(T::TITLE, id))
}

pub async fn update_document<T: FlatDocument>(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
    Json(body): Json<T>,
) -> ApiResult<Json<DocumentRecord<T>>> {
    body.validate()?;
    if !state.db.update_document(user.id, id, &body)? {
        return Err(ApiError::not_found(T::TITLE, id));
    }
    state
        .db
        .get_document::<T>(user.id, id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(T::TITLE, id))
}

pub async fn delete_document<T: FlatDocument>(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state.db.delete_document::<T>(user.id, id)? {
        return Err(ApiError::not_found(T::TITLE, id));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

pub async fn export<T: FlatDocument>(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Response> {
    let format = match query.format.as_deref() {
        None => ExportFormat::default(),
        Some(raw) => ExportFormat::from_str(raw)
            .ok_or_else(|| ApiError::BadRequest(format!("Unsupported export format '{raw}'")))?,
    };
    let record = state
        .db
        .get_document::<T>(user.id, id)?
        .ok_or_else(|| ApiError::not_found(T::TITLE, id))?;

    let exported = export_document(&record, format);
    Ok((
        [
            (header::CONTENT_TYPE, exported.content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", exported.filename),
            ),
        ],
        exported.body,
    )
        .into_response())
}
