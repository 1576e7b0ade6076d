use serde::Deserialize;
use thiserror::Error;

use super::jwt::TokenKind;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// sqlx connection string. `DATABASE_URL` takes priority.
    #[serde(default = "default_database_url")]
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Lifetime of every issued token (session, verification, reset).
    #[serde(default = "default_token_validity")]
    pub token_validity_hours: u64,
    /// `iss` claim written into and required from every token.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Host (and optional port) of the web client; used to build the links
    /// mailed for verification and password reset. `CLIENT_URL` takes priority.
    pub client_url: Option<String>,
    /// HMAC key for session tokens. `AUTH_SECRET` takes priority.
    pub session_secret: Option<String>,
    /// HMAC key for verification tokens. `VERIFY_SECRET` takes priority.
    pub verification_secret: Option<String>,
    /// HMAC key for password-reset tokens. `PASS_SECRET` takes priority.
    pub reset_secret: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl ServerConfig {
    /// Full bind address, e.g. `"0.0.0.0:8080"`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl DatabaseConfig {
    pub fn resolved_url(&self) -> String {
        env_or("DATABASE_URL", Some(&self.url)).unwrap_or_else(default_database_url)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

impl AuthConfig {
    /// `None` when the configured hours do not fit in seconds.
    pub fn token_validity_secs(&self) -> Option<u64> {
        self.token_validity_hours.checked_mul(60 * 60)
    }

    /// Environment variable consulted before the file for each token kind.
    pub fn secret_env_var(kind: TokenKind) -> &'static str {
        match kind {
            TokenKind::Session => "AUTH_SECRET",
            TokenKind::Verification => "VERIFY_SECRET",
            TokenKind::PasswordReset => "PASS_SECRET",
        }
    }

    /// Resolve the signing secret for `kind`, env var first, then the file.
    ///
    /// Returns `None` when neither source is set (startup treats this as a
    /// hard error).
    pub fn resolved_secret(&self, kind: TokenKind) -> Option<String> {
        let from_file = match kind {
            TokenKind::Session => self.session_secret.as_deref(),
            TokenKind::Verification => self.verification_secret.as_deref(),
            TokenKind::PasswordReset => self.reset_secret.as_deref(),
        };
        env_or(Self::secret_env_var(kind), from_file)
    }

    pub fn resolved_client_url(&self) -> Option<String> {
        env_or("CLIENT_URL", self.client_url.as_deref())
    }
}

fn env_or(var: &str, fallback: Option<&str>) -> Option<String> {
    std::env::var(var)
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| fallback.map(str::to_string))
        .filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Serde defaults
// ---------------------------------------------------------------------------

pub fn default_bind() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    8080
}

pub fn default_database_url() -> String {
    "sqlite://cc.db?mode=rwc".to_string()
}

pub fn default_token_validity() -> u64 {
    6
}

pub fn default_issuer() -> String {
    "cc-admin".to_string()
}
