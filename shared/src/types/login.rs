use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

pub const MIN_PASSWORD_LEN: usize = 8;

/// Email/password pair sent by register and login.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Why a credential pair was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    #[error("email has no '@'")]
    InvalidEmail,

    #[error("password shorter than {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,

    #[error("password does not match stored hash")]
    PasswordMismatch,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Format check only; says nothing about whether the account exists.
    pub fn validate(&self) -> Result<(), CredentialError> {
        if !self.email.contains('@') {
            return Err(CredentialError::InvalidEmail);
        }
        validate_password(&self.password)
    }

    /// Emails are stored and compared in lowercase.
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }
}

// Never print the password.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub fn validate_password(password: &str) -> Result<(), CredentialError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CredentialError::PasswordTooShort);
    }
    Ok(())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Login wire types
// ---------------------------------------------------------------------------

/// Response envelope for login: exactly one of the two fields is set.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl TokenResponse {
    pub fn token(token: impl Into<String>) -> Self {
        Self {
            error: None,
            token: Some(token.into()),
        }
    }
}

/// Body of the "am I still logged in" check.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckAuthRequest {
    pub token: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckAuthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub authenticated: bool,
}
