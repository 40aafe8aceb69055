/*
 * Responsibility
 * - gate / token / header / pipeline を束ねる
 * - 外部 (middleware, state) に公開する型を制御する
 */
mod gate;
mod header;
mod pipeline;
mod token;

pub use gate::{Gate, GateResult, Rejection, RequestHead};
pub use header::{HeaderGuard, ValueFilter};
pub use pipeline::{Admission, AdmissionPipeline, GateKind};
pub use token::{TOKEN_PARAM, TokenAuthorizer, UNAUTHORIZED_MESSAGE};
