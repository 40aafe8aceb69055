/*
 * Responsibility
 * - users のインメモリ保存 (永続化はスコープ外)
 * - UserStore を受け取り list / get / create を提供
 * - 重複 id は RepoError::Conflict として返す
 */
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::repos::error::RepoError;
use crate::services::user_schema::User;

#[derive(Clone, Debug, Default)]
pub struct UserStore {
    inner: Arc<RwLock<BTreeMap<u64, User>>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Ascending id order.
pub async fn list(store: &UserStore) -> Vec<User> {
    store.inner.read().await.values().cloned().collect()
}

pub async fn get(store: &UserStore, id: u64) -> Option<User> {
    store.inner.read().await.get(&id).cloned()
}

pub async fn create(store: &UserStore, user: User) -> Result<User, RepoError> {
    let mut users = store.inner.write().await;
    match users.entry(user.id) {
        Entry::Occupied(_) => Err(RepoError::Conflict { id: user.id }),
        Entry::Vacant(slot) => Ok(slot.insert(user).clone()),
    }
}
