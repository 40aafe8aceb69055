/*
 * Responsibility
 * - middleware の公開インターフェース
 * - admission: /api 配下の gate チェーン, http: request-id / trace / limit / timeout
 */
pub mod admission;
pub mod http;
