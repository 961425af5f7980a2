//! Gate for admin surfaces driven by the current-user observable

use chrono::Utc;
use tokio::sync::watch;

use crate::domain::{AuthState, AuthUser};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Auth state still resolving; show a spinner.
    Pending,
    Allow(AuthUser),
    RedirectToLogin,
}

pub struct SessionGuard {
    rx: watch::Receiver<AuthState>,
}

impl SessionGuard {
    pub fn new(rx: watch::Receiver<AuthState>) -> Self {
        Self { rx }
    }

    pub fn decision(&self) -> GuardDecision {
        decide(&self.rx.borrow())
    }

    /// Waits until the provider has reported a user or its absence.
    pub async fn resolved(&mut self) -> GuardDecision {
        match self.rx.wait_for(AuthState::is_resolved).await {
            Ok(state) => decide(&state),
            // Provider gone: fail closed
            Err(_) => GuardDecision::RedirectToLogin,
        }
    }

    /// Waits for the next auth state transition.
    pub async fn changed(&mut self) -> GuardDecision {
        if self.rx.changed().await.is_err() {
            return GuardDecision::RedirectToLogin;
        }
        self.decision()
    }
}

fn decide(state: &AuthState) -> GuardDecision {
    match state {
        AuthState::Resolving => GuardDecision::Pending,
        AuthState::SignedOut => GuardDecision::RedirectToLogin,
        AuthState::SignedIn(user) if user.expires_at <= Utc::now() => GuardDecision::RedirectToLogin,
        AuthState::SignedIn(user) => GuardDecision::Allow(user.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn user(expires_in: Duration) -> AuthUser {
        AuthUser {
            email: "admin@menu.local".into(),
            session_id: Uuid::new_v4(),
            expires_at: Utc::now() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_pending_until_resolved() {
        let (tx, rx) = watch::channel(AuthState::Resolving);
        let mut guard = SessionGuard::new(rx);
        assert_eq!(guard.decision(), GuardDecision::Pending);

        let admin = user(Duration::hours(1));
        let expected = admin.clone();
        tokio::spawn(async move {
            tx.send(AuthState::SignedIn(admin)).unwrap();
            // Keep the sender alive until the guard has seen the value.
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        });

        assert_eq!(guard.resolved().await, GuardDecision::Allow(expected));
    }

    #[tokio::test]
    async fn test_sign_out_transition_redirects() {
        let admin = user(Duration::hours(1));
        let (tx, rx) = watch::channel(AuthState::SignedIn(admin.clone()));
        let mut guard = SessionGuard::new(rx);
        assert_eq!(guard.decision(), GuardDecision::Allow(admin));

        tx.send(AuthState::SignedOut).unwrap();
        assert_eq!(guard.changed().await, GuardDecision::RedirectToLogin);
    }

    #[tokio::test]
    async fn test_expired_session_and_dropped_provider_fail_closed() {
        let (tx, rx) = watch::channel(AuthState::SignedIn(user(Duration::hours(-1))));
        let mut guard = SessionGuard::new(rx);
        assert_eq!(guard.decision(), GuardDecision::RedirectToLogin);

        drop(tx);
        assert_eq!(guard.changed().await, GuardDecision::RedirectToLogin);

        let (tx, rx) = watch::channel(AuthState::Resolving);
        drop(tx);
        assert_eq!(SessionGuard::new(rx).resolved().await, GuardDecision::RedirectToLogin);
    }
}
