/*
 * Responsibility
 * - 環境変数の読み込み (PORT, API_TOKEN, REQUIRED_HEADER, GATE_ORDER など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 * - 起動後は不変。AppState 経由で共有する
 */
use std::net::SocketAddr;
use std::time::Duration;

use axum::http::HeaderName;
use thiserror::Error;

use crate::services::admission::{GateKind, ValueFilter};

pub const DEFAULT_API_TOKEN: &str = "123";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Everything the admission gates need, fixed at startup.
#[derive(Debug, Clone)]
pub struct AdmissionConfig {
    pub expected_token: String,
    pub required_header: HeaderName,
    pub header_filter: ValueFilter,
    pub order: Vec<GateKind>,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            expected_token: DEFAULT_API_TOKEN.to_string(),
            required_header: axum::http::header::USER_AGENT,
            header_filter: ValueFilter::Off,
            order: GateKind::DEPLOYED_ORDER.to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub admission: AdmissionConfig,
    pub body_limit_bytes: usize,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (process env in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // no default port: a missing PORT is a startup error
        let port: u16 = lookup("PORT")
            .ok_or(ConfigError::Missing("PORT"))?
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let expected_token = match lookup("API_TOKEN") {
            Some(token) if token.is_empty() => return Err(ConfigError::Invalid("API_TOKEN")),
            Some(token) => token,
            None => {
                tracing::warn!("API_TOKEN not set, falling back to the built-in token");
                DEFAULT_API_TOKEN.to_string()
            }
        };

        let required_header = match lookup("REQUIRED_HEADER") {
            Some(name) => HeaderName::try_from(name.trim().to_ascii_lowercase())
                .map_err(|_| ConfigError::Invalid("REQUIRED_HEADER"))?,
            None => axum::http::header::USER_AGENT,
        };

        let allow = split_list(lookup("HEADER_ALLOWLIST"));
        let deny = split_list(lookup("HEADER_DENYLIST"));
        let header_filter = match (allow.is_empty(), deny.is_empty()) {
            (true, true) => ValueFilter::Off,
            (false, true) => ValueFilter::Allow(allow),
            (true, false) => ValueFilter::Deny(deny),
            (false, false) => return Err(ConfigError::Invalid("HEADER_ALLOWLIST/HEADER_DENYLIST")),
        };

        let order = match lookup("GATE_ORDER") {
            Some(raw) => parse_gate_order(&raw)?,
            None => GateKind::DEPLOYED_ORDER.to_vec(),
        };

        let body_limit_bytes = lookup("REQUEST_BODY_LIMIT_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        let request_timeout = lookup("REQUEST_TIMEOUT_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        Ok(Self {
            addr,
            app_env,
            admission: AdmissionConfig {
                expected_token,
                required_header,
                header_filter,
                order,
            },
            body_limit_bytes,
            request_timeout,
        })
    }
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Must name each gate exactly once; dropping a gate through config is not allowed.
fn parse_gate_order(raw: &str) -> Result<Vec<GateKind>, ConfigError> {
    let order = raw
        .split(',')
        .map(|s| s.parse::<GateKind>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ConfigError::Invalid("GATE_ORDER"))?;

    let complete = order.len() == GateKind::DEPLOYED_ORDER.len()
        && GateKind::DEPLOYED_ORDER.iter().all(|k| order.contains(k));

    if complete {
        Ok(order)
    } else {
        Err(ConfigError::Invalid("GATE_ORDER"))
    }
}
