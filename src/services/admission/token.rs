/*
 * Responsibility
 * - `token` query parameter の検証 (期待値との完全一致)
 * - 不一致・欠落・重複はすべて 401
 *
 * Notes
 * - credential は trace レベルでのみログに出す
 * - 比較は通常の文字列比較。本番では constant-time 比較への置き換えを推奨
 */
use axum::http::StatusCode;

use super::gate::{Gate, GateResult, RequestHead};

pub const TOKEN_PARAM: &str = "token";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized: Invalid Token";

#[derive(Debug, Clone)]
pub struct TokenAuthorizer {
    expected: String,
}

impl TokenAuthorizer {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    pub fn authorize(&self, credential: Option<&str>) -> GateResult {
        tracing::trace!(credential = ?credential, "received credential");

        match credential {
            Some(token) if token == self.expected => GateResult::Pass,
            _ => GateResult::reject(StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE),
        }
    }
}

impl Gate for TokenAuthorizer {
    fn name(&self) -> &'static str {
        "token"
    }

    fn check(&self, head: &RequestHead<'_>) -> GateResult {
        // `?token=a&token=a` is ambiguous, never a match
        match head.query_values(TOKEN_PARAM).as_slice() {
            [single] => self.authorize(Some(*single)),
            [] => self.authorize(None),
            _ => GateResult::reject(StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE),
        }
    }
}
