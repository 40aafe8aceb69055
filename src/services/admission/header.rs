/*
 * Responsibility
 * - 必須ヘッダの存在チェック (大文字小文字を区別しない / 空文字は欠落扱い)
 * - 値フィルタ (allowlist / denylist) の拡張ポイント。既定は Off (存在チェックのみ)
 */
use axum::http::{HeaderMap, HeaderName, StatusCode};

use super::gate::{Gate, GateResult, RequestHead};

/// Optional filter over the observed header value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValueFilter {
    #[default]
    Off,
    Allow(Vec<String>),
    Deny(Vec<String>),
}

impl ValueFilter {
    fn permits(&self, value: &str) -> bool {
        match self {
            ValueFilter::Off => true,
            ValueFilter::Allow(values) => values.iter().any(|v| v == value),
            ValueFilter::Deny(values) => !values.iter().any(|v| v == value),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeaderGuard {
    name: HeaderName,
    filter: ValueFilter,
    message: String,
}

impl HeaderGuard {
    pub fn new(name: HeaderName, filter: ValueFilter) -> Self {
        let message = format!("Bad Request: Missing {} header", display_name(&name));
        Self {
            name,
            filter,
            message,
        }
    }

    pub fn check_headers(&self, headers: &HeaderMap) -> GateResult {
        // non-UTF8 values count as missing
        let value = headers.get(&self.name).and_then(|v| v.to_str().ok());

        tracing::debug!(header = %self.name, value = ?value, "observed header");

        match value {
            Some(v) if !v.is_empty() && self.filter.permits(v) => GateResult::Pass,
            _ => GateResult::reject(StatusCode::BAD_REQUEST, self.message.clone()),
        }
    }
}

impl Gate for HeaderGuard {
    fn name(&self) -> &'static str {
        "header"
    }

    fn check(&self, head: &RequestHead<'_>) -> GateResult {
        self.check_headers(head.headers)
    }
}

/// `user-agent` -> `User-Agent`
fn display_name(name: &HeaderName) -> String {
    name.as_str()
        .split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
