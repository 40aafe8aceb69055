/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - users: UserStore, admission: AdmissionPipeline
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - 起動後に変更される共有状態は UserStore のみ。pipeline は読み取り専用
 */
use std::sync::Arc;

use crate::config::AdmissionConfig;
use crate::repos::user_repo::UserStore;
use crate::services::admission::AdmissionPipeline;

#[derive(Clone, Debug)]
pub struct AppState {
    pub users: UserStore,
    pub admission: Arc<AdmissionPipeline>,
}

impl AppState {
    pub fn new(users: UserStore, admission: Arc<AdmissionPipeline>) -> Self {
        Self { users, admission }
    }

    pub fn from_config(config: &AdmissionConfig) -> Self {
        Self::new(
            UserStore::new(),
            Arc::new(AdmissionPipeline::from_config(config)),
        )
    }
}
