/*
 * Responsibility
 * - /users 系 handler (list / get / create)
 * - admission pipeline 通過後にのみ呼ばれる (token / header はここでは見ない)
 * - create は body を user_schema::validate に通し、違反はすべてまとめて 422 で返す
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{dto::users::UserResponse, extractors::JsonBody},
    error::AppError,
    repos::user_repo,
    services::user_schema,
    state::AppState,
};

pub async fn list_users(State(state): State<AppState>) -> Json<Vec<UserResponse>> {
    let users = user_repo::list(&state.users).await;
    Json(users.into_iter().map(UserResponse::from).collect())
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let id: u64 = user_id
        .parse()
        .map_err(|_| AppError::bad_request("Bad Request: Invalid user id"))?;

    let user = user_repo::get(&state.users, id)
        .await
        .ok_or(AppError::not_found("User"))?;

    Ok(Json(user.into()))
}

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = user_schema::validate(&body).map_err(|violations| {
        tracing::debug!(count = violations.len(), "user payload rejected");
        AppError::Unprocessable(violations)
    })?;

    let created = user_repo::create(&state.users, user).await?;
    tracing::info!(user_id = created.id, "user created");

    Ok((StatusCode::CREATED, Json(created.into())))
}
