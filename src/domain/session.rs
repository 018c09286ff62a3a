//! Login sessions keyed by opaque bearer tokens.
//!
//! [`SessionManager`] is the single owner of session state. It is injected
//! into the application state; nothing else reads or writes sessions.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use utoipa::ToSchema;

/// Opaque session token handed to the browser.
///
/// Wraps a UUID v4 so tokens cannot be confused with other identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct SessionToken(uuid::Uuid);

impl SessionToken {
    /// Creates a new random token.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s.trim()).map(Self)
    }
}

/// An authenticated session.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Session {
    /// Bearer token.
    pub token: SessionToken,
    /// Id of the signed-in user.
    pub user_id: i64,
    /// Email of the signed-in user.
    pub email: String,
    /// Name shown in the dashboard header.
    pub display_name: String,
    /// Login time.
    pub created_at: DateTime<Utc>,
    /// Time after which the token is no longer accepted.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Returns `true` once `now` has reached the expiry time.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Longest accepted session lifetime (one year).
const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// In-process session table.
#[derive(Debug)]
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionToken, Session>>,
    ttl: Duration,
}

impl SessionManager {
    /// Creates an empty table whose sessions live for `ttl_secs` seconds,
    /// clamped to between one second and one year.
    #[must_use]
    pub fn new(ttl_secs: u64) -> Self {
        let secs = i64::try_from(ttl_secs.clamp(1, MAX_TTL_SECS)).unwrap_or(1);
        let ttl = Duration::seconds(secs);
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Opens a session for an already verified user.
    pub async fn open(&self, user_id: i64, email: &str, display_name: &str) -> Session {
        let now = Utc::now();
        let session = Session {
            token: SessionToken::new(),
            user_id,
            email: email.to_string(),
            display_name: display_name.to_string(),
            created_at: now,
            expires_at: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.sessions
            .write()
            .await
            .insert(session.token, session.clone());
        session
    }

    /// Closes a session. Returns `false` if the token was unknown.
    pub async fn close(&self, token: SessionToken) -> bool {
        self.sessions.write().await.remove(&token).is_some()
    }

    /// Looks up a live session, dropping it if it has expired.
    pub async fn current(&self, token: SessionToken) -> Option<Session> {
        self.current_at(token, Utc::now()).await
    }

    /// Same as [`SessionManager::current`] with an explicit clock.
    pub async fn current_at(&self, token: SessionToken, now: DateTime<Utc>) -> Option<Session> {
        let session = self.sessions.read().await.get(&token).cloned()?;
        if session.is_expired_at(now) {
            self.sessions.write().await.remove(&token);
            tracing::debug!(user_id = session.user_id, "session expired");
            return None;
        }
        Some(session)
    }

    /// Removes every session expired at `now`. Returns how many were removed.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut map = self.sessions.write().await;
        let before = map.len();
        map.retain(|_, s| !s.is_expired_at(now));
        before - map.len()
    }

    /// Number of sessions currently held, including expired ones not yet
    /// purged.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` if no sessions are held.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
