//! admission pipeline (token → header) を `/api/*` の前段に掛ける
//!
//! - request の head (method / path / headers / query) だけを読む。body には触れない
//! - 最初の rejection でそのまま応答し、handler は呼ばない
//! - すべて通過した場合のみ `next.run` を 1 回だけ呼ぶ

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::admission::{Admission, RequestHead};
use crate::state::AppState;

/// `/api/*` の routes に admission pipeline を適用する。
///
/// 例：
/// ```ignore
/// let api = api::v1::routes();
/// let api = middleware::admission::apply(api, state.clone());
/// app = app.nest("/api", api);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, admission_middleware))
}

async fn admission_middleware(
    State(state): State<AppState>,
    OriginalUri(original_uri): OriginalUri,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let outcome = {
        let head = RequestHead::new(
            req.method(),
            original_uri.path(),
            req.headers(),
            original_uri.query(),
        );
        state.admission.evaluate(&head)
    };

    match outcome {
        Admission::Admitted => Ok(next.run(req).await),
        Admission::Rejected { rejection, .. } => Err(AppError::Rejected(rejection)),
    }
}
