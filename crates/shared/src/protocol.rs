use serde::{Deserialize, Serialize};

use crate::domain::{User, UserId};

pub const LIST_USERS_PATH: &str = "users";
pub const CREATE_USER_PATH: &str = "create_user";

pub fn update_user_path(id: UserId) -> String {
    format!("update_user/{}", id.0)
}

pub fn delete_user_path(id: UserId) -> String {
    format!("delete_user/{}", id.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}
