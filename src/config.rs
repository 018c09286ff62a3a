//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The store URL and store key are the
//! only mandatory keys; everything else falls back to a default.

use std::net::SocketAddr;

/// Configuration errors raised while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A mandatory variable is not set (or is blank).
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {key}: {reason}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Parser message.
        reason: String,
    },
}

/// Upstream chat-completion endpoint used by the chat relay.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Full URL of an OpenAI-compatible `chat/completions` endpoint.
    pub api_url: String,
    /// Optional bearer key sent upstream.
    pub api_key: Option<String>,
    /// Model name placed in every upstream request.
    pub model: String,
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`DashboardConfig::from_env`].
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// PostgreSQL connection URL of the hosted store.
    pub store_url: String,

    /// Store access key, used as the connection password.
    pub store_key: String,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Minimum idle connections in the pool.
    pub database_min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// Apply the embedded migrations at startup.
    pub run_migrations: bool,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Lifetime of a login session in seconds.
    pub session_ttl_secs: u64,

    /// Chat relay upstream, if configured.
    pub chat: Option<ChatConfig>,
}

impl DashboardConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if `STORE_URL` or `STORE_KEY` is
    /// absent, and [`ConfigError::Invalid`] if `LISTEN_ADDR` cannot be parsed
    /// as a [`SocketAddr`] or `SESSION_TTL_SECS` is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`DashboardConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_url = required(&lookup, "STORE_URL")?;
        let store_key = required(&lookup, "STORE_KEY")?;

        let listen_addr: SocketAddr = lookup("LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                key: "LISTEN_ADDR",
                reason: e.to_string(),
            })?;

        let chat = lookup("CHAT_API_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|api_url| ChatConfig {
                api_url,
                api_key: lookup("CHAT_API_KEY").filter(|k| !k.trim().is_empty()),
                model: lookup("CHAT_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            });

        let session_ttl_secs = parse_or(&lookup, "SESSION_TTL_SECS", 86_400);
        if session_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "SESSION_TTL_SECS",
                reason: "must be at least 1 second".to_string(),
            });
        }

        Ok(Self {
            listen_addr,
            store_url,
            store_key,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10),
            database_min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 2),
            database_connect_timeout_secs: parse_or(&lookup, "DATABASE_CONNECT_TIMEOUT_SECS", 5),
            run_migrations: parse_bool_or(&lookup, "RUN_MIGRATIONS", true),
            event_bus_capacity: parse_or(&lookup, "EVENT_BUS_CAPACITY", 1024),
            session_ttl_secs,
            chat,
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

/// Parses a variable as `T`, returning `default` on missing or invalid
/// values.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Parses a variable as a boolean. Accepts `"true"`, `"1"`, `"false"`,
/// `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_bool_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}
