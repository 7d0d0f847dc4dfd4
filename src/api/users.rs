use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;

use super::{ApiError, ApiResult, AppState};
use crate::models::{RegisterUserInput, User};
use crate::validation::is_blank;

/// Header carrying the acting user's email.
pub const USER_HEADER: &str = "x-user-email";

/// The user a request acts for, resolved from [`USER_HEADER`].
#[derive(Debug, Clone)]
pub struct ActingUser(pub User);

impl FromRequestParts<AppState> for ActingUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let email = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !is_blank(v))
            .ok_or_else(|| ApiError::Unauthorized(format!("Missing {USER_HEADER} header")))?;

        let user = state
            .db
            .find_user_by_email(email)?
            .ok_or_else(|| ApiError::Unauthorized(format!("Unknown user '{email}'")))?;
        Ok(Self(user))
    }
}

pub async fn register_user(
    State(state): State<AppState>,
    Json(input): Json<RegisterUserInput>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.db.register_user(&input.email)?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn current_user(ActingUser(user): ActingUser) -> Json<User> {
    Json(user)
}
