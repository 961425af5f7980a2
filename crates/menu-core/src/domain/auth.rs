//! Signed-in admin identity as observed by the UI

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub email: String,
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Value published by the auth provider's current-user observable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// Provider has not reported yet (initial page load).
    #[default]
    Resolving,
    SignedOut,
    SignedIn(AuthUser),
}

impl AuthState {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            AuthState::SignedIn(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, AuthState::Resolving)
    }
}

/// Result of a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignedInSession {
    pub user: AuthUser,
    pub token: String,
}
