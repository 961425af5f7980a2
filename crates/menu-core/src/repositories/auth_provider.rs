//! Auth provider trait (port)

use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;

use crate::domain::{AuthState, AuthUser, SignedInSession};
use crate::error::DomainError;

/// Hosted authentication service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedInSession, DomainError>;
    async fn sign_out(&self, session_id: Uuid) -> Result<(), DomainError>;
    /// User behind a bearer token, `None` when the session is unknown or ended.
    async fn verify(&self, token: &str) -> Result<Option<AuthUser>, DomainError>;
    /// Observable current user.
    fn current_user(&self) -> watch::Receiver<AuthState>;
}
