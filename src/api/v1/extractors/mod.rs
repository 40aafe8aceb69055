/*
 * Responsibility
 * - handler が使う extractor をまとめて公開する
 */
mod json_body;

pub use json_body::JsonBody;
