use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The requesting user. Credentials live with the auth layer, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: i64, email: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            username: username.into(),
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
