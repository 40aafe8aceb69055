/*
 * Responsibility
 * - v1 の URL 構造を定義 (/users, /users/{id})
 * - admission pipeline は app.rs で `/api` 全体に掛ける
 */
use axum::{Router, routing::get};

use crate::error::AppError;
use crate::state::AppState;

use crate::api::v1::handlers::users::{create_user, get_user, list_users};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{user_id}", get(get_user))
        .method_not_allowed_fallback(method_not_allowed)
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
