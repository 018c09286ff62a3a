//! Authentication service: credential verification and session lifecycle.

use std::sync::Arc;

use crate::domain::{Credentials, Session, SessionManager, SessionToken};
use crate::error::DashboardError;
use crate::persistence::WildlifeStore;

/// Verifies credentials against the `users` table and owns login sessions.
///
/// `login`, `logout` and `current_session` are the only way the rest of the
/// service touches session state.
#[derive(Debug, Clone)]
pub struct AuthService {
    store: Arc<dyn WildlifeStore>,
    sessions: Arc<SessionManager>,
}

impl AuthService {
    /// Creates a new `AuthService`.
    #[must_use]
    pub fn new(store: Arc<dyn WildlifeStore>, sessions: Arc<SessionManager>) -> Self {
        Self { store, sessions }
    }

    /// Returns a reference to the session table.
    #[must_use]
    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Validates the input, verifies the password hash and opens a session.
    ///
    /// An unknown email and a wrong password fail identically.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidRequest`] for a malformed email or
    /// short password, [`DashboardError::InvalidCredentials`] when
    /// verification fails, and [`DashboardError::StoreError`] if the user
    /// lookup fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, DashboardError> {
        let credentials = Credentials::parse(email, password)?;

        let account = self
            .store
            .find_user_by_email(credentials.email())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "user lookup failed"))?;

        let Some(account) = account else {
            tracing::warn!(email = %credentials.email(), "login for unknown email");
            return Err(DashboardError::InvalidCredentials);
        };

        let hash = account.password_hash.clone();
        let password = credentials.password().to_string();
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| DashboardError::Internal(format!("password check aborted: {e}")))?
            .map_err(|e| {
                tracing::error!(user_id = account.id, error = %e, "stored password hash unreadable");
                DashboardError::InvalidCredentials
            })?;

        if !verified {
            tracing::warn!(user_id = account.id, "login with wrong password");
            return Err(DashboardError::InvalidCredentials);
        }

        let session = self
            .sessions
            .open(account.id, &account.email, &account.display_name)
            .await;
        tracing::info!(user_id = account.id, "user logged in");
        Ok(session)
    }

    /// Ends a session.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Unauthorized`] if the token is unknown.
    pub async fn logout(&self, token: SessionToken) -> Result<(), DashboardError> {
        if self.sessions.close(token).await {
            tracing::info!("user logged out");
            Ok(())
        } else {
            Err(DashboardError::Unauthorized("unknown session".to_string()))
        }
    }

    /// Returns the live session for `token`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Unauthorized`] if the token is unknown or
    /// expired.
    pub async fn current_session(&self, token: SessionToken) -> Result<Session, DashboardError> {
        self.sessions
            .current(token)
            .await
            .ok_or_else(|| DashboardError::Unauthorized("session expired or unknown".to_string()))
    }
}
