/*
 * Responsibility
 * - request body を型なし JSON (serde_json::Value) として受ける
 * - axum の JsonRejection を AppError (400 / 413, `message` 付き JSON) に変換する
 * - 形 (shape) の検証はここでは行わない (user_schema::validate の責務)
 */
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;

use crate::error::AppError;

#[derive(Debug)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "rejected request body");
                Err(rejection_to_error(&rejection))
            }
        }
    }
}

fn rejection_to_error(rejection: &JsonRejection) -> AppError {
    // body limit hit while buffering (no Content-Length up front)
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge;
    }

    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::bad_request("Bad Request: Expected Content-Type: application/json")
        }
        _ => AppError::bad_request("Bad Request: Malformed JSON body"),
    }
}
