use std::fmt;

use cc_shared::types::TokenKind;
use cc_shared::types::server_config::{AuthConfig, ConfigError};

/// Immutable auth configuration resolved once at startup.
#[derive(Clone)]
pub struct AuthSettings {
    pub issuer: String,
    pub token_validity_secs: u64,
    /// Host (and optional port) the mailed links point at.
    pub client_url: String,
    session_secret: String,
    verification_secret: String,
    reset_secret: String,
}

impl AuthSettings {
    pub fn new(
        issuer: impl Into<String>,
        token_validity_secs: u64,
        client_url: impl Into<String>,
        session_secret: impl Into<String>,
        verification_secret: impl Into<String>,
        reset_secret: impl Into<String>,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            token_validity_secs,
            client_url: client_url.into(),
            session_secret: session_secret.into(),
            verification_secret: verification_secret.into(),
            reset_secret: reset_secret.into(),
        }
    }

    /// Freeze the env-first resolution of `config`. Expects a config that
    /// already passed `validate_config`; missing values are still reported
    /// rather than defaulted.
    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigError> {
        let secret = |kind: TokenKind| {
            config.resolved_secret(kind).ok_or_else(|| {
                ConfigError::InvalidConfig(format!(
                    "no {} secret (set {})",
                    kind,
                    AuthConfig::secret_env_var(kind)
                ))
            })
        };
        let client_url = config.resolved_client_url().ok_or_else(|| {
            ConfigError::InvalidConfig("no client url (set CLIENT_URL or auth.client_url)".into())
        })?;
        let token_validity_secs = config.token_validity_secs().ok_or_else(|| {
            ConfigError::InvalidConfig("token_validity_hours overflows seconds".into())
        })?;

        Ok(Self::new(
            config.issuer.clone(),
            token_validity_secs,
            client_url,
            secret(TokenKind::Session)?,
            secret(TokenKind::Verification)?,
            secret(TokenKind::PasswordReset)?,
        ))
    }

    pub fn secret(&self, kind: TokenKind) -> &str {
        match kind {
            TokenKind::Session => &self.session_secret,
            TokenKind::Verification => &self.verification_secret,
            TokenKind::PasswordReset => &self.reset_secret,
        }
    }

    pub fn verify_link(&self, token: &str) -> String {
        format!("http://{}/verify/{}", self.client_url, token)
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!("http://{}/change-password/{}", self.client_url, token)
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("issuer", &self.issuer)
            .field("token_validity_secs", &self.token_validity_secs)
            .field("client_url", &self.client_url)
            .field("secrets", &"<redacted>")
            .finish()
    }
}
