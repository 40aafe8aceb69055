/*
 * Responsibility
 * - Users の response DTO
 * - request body は型なし (serde_json::Value) で受け、user_schema::validate で User に変換する
 */
use serde::Serialize;

use crate::services::user_schema::User;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}
