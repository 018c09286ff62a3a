//! Login input validation.
//!
//! These rules run before any lookup against the store: a syntactically
//! invalid email or a short password never reaches the identity check.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::DashboardError;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

#[allow(clippy::expect_used)]
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Syntactically valid login credentials.
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Validates the email pattern and password length.
    ///
    /// The email is trimmed and lowercased so lookups are case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidRequest`] when the email does not look
    /// like an address or the password is shorter than [`MIN_PASSWORD_LEN`].
    pub fn parse(email: &str, password: &str) -> Result<Self, DashboardError> {
        let email = email.trim().to_lowercase();
        if !EMAIL_PATTERN.is_match(&email) {
            return Err(DashboardError::InvalidRequest(
                "please enter a valid email address".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DashboardError::InvalidRequest(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(Self {
            email,
            password: password.to_string(),
        })
    }

    /// Normalized email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Plain-text password, only for hash verification.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
