/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON body, top-level `message`)
 * - gate rejection / schema violation / repo error を統一的に変換
 * - 内部の詳細 (credential, 内部エラー) はクライアントに返さない
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::admission::Rejection;
use crate::services::user_schema::Violation;

pub const UNPROCESSABLE_MESSAGE: &str = "Unprocessable Entity: Invalid user payload";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<Violation>>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("rejected: {0:?}")]
    Rejected(Rejection),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unprocessable entity")]
    Unprocessable(Vec<Violation>),
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("request timed out")]
    Timeout,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Rejected(Rejection { status, message }) => (status, message, None),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            AppError::Unprocessable(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                UNPROCESSABLE_MESSAGE.to_string(),
                Some(violations),
            ),
            AppError::NotFound { resource } => {
                (StatusCode::NOT_FOUND, format!("{resource} not found"), None)
            }
            AppError::Conflict(message) => (StatusCode::CONFLICT, message, None),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method Not Allowed".to_string(),
                None,
            ),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Payload Too Large".to_string(),
                None,
            ),
            AppError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                "Request Timeout".to_string(),
                None,
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
                None,
            ),
        };

        (status, Json(ErrorResponse { message, errors })).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict { id } => {
                AppError::Conflict(format!("Conflict: User {id} already exists"))
            }
        }
    }
}
