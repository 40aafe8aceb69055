/*
 * Responsibility
 * - Gate の契約 (trait) と判定結果 (GateResult / Rejection) の定義
 * - Gate が読む request の読み取り専用ビュー (RequestHead)
 *
 * Notes
 * - Gate は (request, 固定設定) の純関数。I/O を持たない
 * - body は読まない (body の検証は handler 側の SchemaValidator の責務)
 */
use axum::http::{HeaderMap, Method, StatusCode};

/// A gate's verdict for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateResult {
    Pass,
    Reject(Rejection),
}

impl GateResult {
    pub fn reject(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Reject(Rejection {
            status,
            message: message.into(),
        })
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Terminal outcome of a failed gate: the status and the client-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub status: StatusCode,
    pub message: String,
}

/// A single admission check.
pub trait Gate: Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    fn check(&self, head: &RequestHead<'_>) -> GateResult;
}

/// Read-only snapshot of the parts of a request the gates look at.
#[derive(Debug)]
pub struct RequestHead<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub headers: &'a HeaderMap,
    query: Vec<(String, String)>,
}

impl<'a> RequestHead<'a> {
    pub fn new(
        method: &'a Method,
        path: &'a str,
        headers: &'a HeaderMap,
        raw_query: Option<&str>,
    ) -> Self {
        let query = raw_query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        Self {
            method,
            path,
            headers,
            query,
        }
    }

    /// All values of a query parameter, in the order they appeared.
    pub fn query_values(&self, name: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}
