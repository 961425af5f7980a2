// ============================================================================
// Menu Core - Authentication Service
// File: crates/menu-core/src/services/auth_service.rs
// ============================================================================
//! Admin sign-in, sign-out and bearer token checks on top of the auth provider

use std::sync::Arc;

use menu_shared::utils::mask_email;
use tracing::{error, info, warn};
use validator::Validate;

use crate::domain::{AuthUser, SignedInSession};
use crate::error::DomainError;
use crate::repositories::AuthProvider;
use crate::services::session_guard::SessionGuard;

#[derive(Debug, Validate)]
struct LoginInput {
    #[validate(email(message = "A valid email is required"))]
    email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    password: String,
}

pub struct AuthService {
    provider: Arc<dyn AuthProvider>,
}

impl AuthService {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self { provider }
    }

    /// Login with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<SignedInSession, DomainError> {
        let input = LoginInput {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        input.validate()?;

        let masked = mask_email(&input.email);
        info!("Login attempt for email: {}", masked);

        match self.provider.sign_in(&input.email, &input.password).await {
            Ok(session) => {
                info!("Login successful for: {}", masked);
                Ok(session)
            }
            Err(DomainError::AuthProviderError(e)) => {
                error!("Auth provider unavailable during login: {}", e);
                Err(DomainError::AuthProviderError(e))
            }
            Err(e) => {
                warn!("Login failed for {}: {}", masked, e);
                Err(DomainError::InvalidCredentials)
            }
        }
    }

    /// Ends the session behind `token`.
    pub async fn logout(&self, token: &str) -> Result<(), DomainError> {
        let user = self.authorize(token).await?;
        self.provider.sign_out(user.session_id).await?;
        info!("Logout for: {}", mask_email(&user.email));
        Ok(())
    }

    /// Signed-in user behind a bearer token.
    pub async fn authorize(&self, token: &str) -> Result<AuthUser, DomainError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DomainError::Unauthenticated);
        }
        self.provider
            .verify(token)
            .await?
            .ok_or(DomainError::Unauthenticated)
    }

    /// Guard over the provider's current-user observable, for in-process
    /// admin surfaces. The HTTP surface gates per request on `authorize`.
    pub fn session_guard(&self) -> SessionGuard {
        SessionGuard::new(self.provider.current_user())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AuthState;
    use crate::repositories::auth_provider::MockAuthProvider;
    use crate::services::session_guard::GuardDecision;
    use chrono::{Duration, Utc};
    use tokio::sync::watch;
    use uuid::Uuid;

    fn user() -> AuthUser {
        AuthUser {
            email: "admin@menu.local".into(),
            session_id: Uuid::new_v4(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[tokio::test]
    async fn test_login_validates_before_calling_provider() {
        // No expectations: any provider call panics.
        let service = AuthService::new(Arc::new(MockAuthProvider::new()));

        let result = service.login("not-an-email", "secret").await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));

        let result = service.login("admin@menu.local", "").await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_login_maps_rejections_to_invalid_credentials() {
        let mut provider = MockAuthProvider::new();
        provider
            .expect_sign_in()
            .times(1)
            .returning(|_, _| Err(DomainError::InternalError("wrong password".into())));
        let service = AuthService::new(Arc::new(provider));

        let result = service.login(" admin@menu.local ", "nope").await;
        assert!(matches!(result, Err(DomainError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_surfaces_provider_outage() {
        let mut provider = MockAuthProvider::new();
        provider
            .expect_sign_in()
            .returning(|_, _| Err(DomainError::AuthProviderError("timeout".into())));
        let service = AuthService::new(Arc::new(provider));

        let result = service.login("admin@menu.local", "secret").await;
        assert!(matches!(result, Err(DomainError::AuthProviderError(_))));
    }

    #[tokio::test]
    async fn test_login_passes_trimmed_email() {
        let signed_in = user();
        let mut provider = MockAuthProvider::new();
        provider.expect_sign_in().times(1).returning(move |email, _| {
            assert_eq!(email, "admin@menu.local");
            Ok(SignedInSession {
                user: signed_in.clone(),
                token: "token".into(),
            })
        });
        let service = AuthService::new(Arc::new(provider));

        let session = service.login("  admin@menu.local", "secret").await.unwrap();
        assert_eq!(session.token, "token");
    }

    #[tokio::test]
    async fn test_authorize_and_logout() {
        let signed_in = user();
        let session_id = signed_in.session_id;
        let mut provider = MockAuthProvider::new();
        provider.expect_verify().returning(move |token| {
            Ok((token == "good").then(|| signed_in.clone()))
        });
        provider
            .expect_sign_out()
            .times(1)
            .returning(move |id| {
                assert_eq!(id, session_id);
                Ok(())
            });
        let service = AuthService::new(Arc::new(provider));

        assert!(matches!(service.authorize("").await, Err(DomainError::Unauthenticated)));
        assert!(matches!(service.authorize("bad").await, Err(DomainError::Unauthenticated)));
        assert_eq!(service.authorize("good").await.unwrap().session_id, session_id);
        service.logout("good").await.unwrap();
    }

    #[tokio::test]
    async fn test_session_guard_uses_provider_observable() {
        let (tx, rx) = watch::channel(AuthState::SignedOut);
        let mut provider = MockAuthProvider::new();
        provider.expect_current_user().return_once(move || rx);
        let service = AuthService::new(Arc::new(provider));

        let guard = service.session_guard();
        assert_eq!(guard.decision(), GuardDecision::RedirectToLogin);
        drop(tx);
    }
}
