//! Request and response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use menu_core::domain::{AuthUser, SignedInSession};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: UserDto,
}

impl From<SignedInSession> for LoginResponse {
    fn from(session: SignedInSession) -> Self {
        Self {
            access_token: session.token,
            token_type: "Bearer",
            user: session.user.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub email: String,
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
}

impl From<AuthUser> for UserDto {
    fn from(user: AuthUser) -> Self {
        Self {
            email: user.email,
            session_id: user.session_id.to_string(),
            expires_at: user.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    /// Labels accepted on items
    pub categories: Vec<String>,
    /// Picker options, `All Items` first
    pub filters: Vec<String>,
    /// Categories carried by stored items, first-seen order
    pub in_use: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub image_path: String,
}
