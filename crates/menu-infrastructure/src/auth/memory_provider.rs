// ============================================================================
// Menu Infrastructure - In-Memory Auth Provider
// File: crates/menu-infrastructure/src/auth/memory_provider.rs
// ============================================================================
//! Admin accounts with argon2 hashes, JWT bearer tokens and a server-side
//! session table. Sign-in and sign-out are published on a watch channel.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use menu_core::domain::{AuthState, AuthUser, SignedInSession};
use menu_core::error::DomainError;
use menu_core::repositories::AuthProvider;
use menu_security::{PasswordError, PasswordService, Session, TokenError, TokenService};
use menu_shared::utils::mask_email;

pub struct InMemoryAuthProvider {
    /// lowercase email -> argon2 hash
    accounts: DashMap<String, String>,
    sessions: DashMap<Uuid, Session>,
    tokens: TokenService,
    session_ttl_seconds: i64,
    state: watch::Sender<AuthState>,
}

impl InMemoryAuthProvider {
    pub fn new(tokens: TokenService, session_ttl_seconds: i64) -> Self {
        let (state, _) = watch::channel(AuthState::SignedOut);
        Self {
            accounts: DashMap::new(),
            sessions: DashMap::new(),
            tokens,
            session_ttl_seconds,
            state,
        }
    }

    /// Registers an admin. Plain passwords are hashed; argon2 hashes are kept.
    pub fn add_admin(&self, email: &str, password: &str) -> Result<(), DomainError> {
        let hash = PasswordService::hash_if_plain(password)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;
        self.accounts.insert(email.trim().to_lowercase(), hash);
        info!("Admin account registered: {}", mask_email(email));
        Ok(())
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Drops sessions whose token can no longer be presented.
    fn prune_expired(&self) {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired());
        let pruned = before.saturating_sub(self.sessions.len());
        if pruned > 0 {
            debug!("Pruned {} expired sessions", pruned);
        }
    }

    fn user_of(session: &Session) -> AuthUser {
        AuthUser {
            email: session.email.clone(),
            session_id: session.id,
            expires_at: session.expires_at,
        }
    }

    /// Falls back to another live session, or signed out, when the
    /// published user's session ends.
    fn republish_after_end(&self, ended: Uuid) {
        let current = self.state.borrow().user().map(|u| u.session_id);
        if current != Some(ended) {
            return;
        }
        let next = self
            .sessions
            .iter()
            .find(|entry| !entry.value().is_expired())
            .map(|entry| Self::user_of(entry.value()));
        self.state.send_replace(match next {
            Some(user) => AuthState::SignedIn(user),
            None => AuthState::SignedOut,
        });
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedInSession, DomainError> {
        let key = email.trim().to_lowercase();
        let hash = self
            .accounts
            .get(&key)
            .map(|entry| entry.value().clone())
            .ok_or(DomainError::InvalidCredentials)?;

        PasswordService::verify(password, &hash).map_err(|e| match e {
            PasswordError::Mismatch => DomainError::InvalidCredentials,
            other => {
                error!("Stored hash for {} is unusable: {}", mask_email(&key), other);
                DomainError::InternalError(other.to_string())
            }
        })?;

        let session = Session::new(key, self.session_ttl_seconds);
        let token = self
            .tokens
            .issue(&session)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;
        let user = Self::user_of(&session);
        self.prune_expired();
        self.sessions.insert(session.id, session);
        self.state.send_replace(AuthState::SignedIn(user.clone()));

        debug!("Session {} opened", user.session_id);
        Ok(SignedInSession { user, token })
    }

    async fn sign_out(&self, session_id: Uuid) -> Result<(), DomainError> {
        if self.sessions.remove(&session_id).is_none() {
            warn!("Sign-out for unknown session {}", session_id);
        }
        self.republish_after_end(session_id);
        Ok(())
    }

    async fn verify(&self, token: &str) -> Result<Option<AuthUser>, DomainError> {
        let claims = match self.tokens.validate(token) {
            Ok(claims) => claims,
            Err(TokenError::TokenExpired) => {
                debug!("Rejected expired token");
                return Ok(None);
            }
            Err(e) => {
                debug!("Rejected token: {}", e);
                return Ok(None);
            }
        };
        let session_id = match claims.session_id() {
            Ok(id) => id,
            Err(_) => return Ok(None),
        };

        let session = match self.sessions.get(&session_id) {
            Some(entry) => entry.value().clone(),
            None => return Ok(None),
        };
        if session.is_expired() {
            self.sessions.remove(&session_id);
            self.republish_after_end(session_id);
            return Ok(None);
        }
        Ok(Some(Self::user_of(&session)))
    }

    fn current_user(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}
