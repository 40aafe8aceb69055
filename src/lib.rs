/*
 * Responsibility
 * - crate のモジュール公開 (main.rs と tests/ から同じ Router を組み立てるため)
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
