use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::access_level::AccessLevel;

/// The three kinds of signed token the server hands out.
///
/// Each kind is signed with its own secret, so a token minted for one kind
/// never verifies as another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Session,
    Verification,
    PasswordReset,
}

impl TokenKind {
    pub const ALL: [TokenKind; 3] = [
        TokenKind::Session,
        TokenKind::Verification,
        TokenKind::PasswordReset,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Session => "session",
            TokenKind::Verification => "verification",
            TokenKind::PasswordReset => "password-reset",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claim payload bound to a single [`TokenKind`].
pub trait TokenClaims: Serialize + DeserializeOwned {
    const KIND: TokenKind;

    fn user_id(&self) -> i64;

    /// Unix timestamp (seconds) after which the token is rejected.
    fn expires_at(&self) -> u64;
}

/// Proves "who, at what level" on ordinary requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: i64,
    pub access_level: AccessLevel,
    /// Standard JWT expiry (Unix timestamp, seconds).
    pub exp: u64,
    pub iss: String,
}

/// Carried by the link mailed after registration.
///
/// The access level is captured at issuance; verification only succeeds
/// while the stored account still has exactly this id, email and level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationClaims {
    pub user_id: i64,
    pub email: String,
    pub access_level: AccessLevel,
    pub exp: u64,
    pub iss: String,
}

/// Carried by the link mailed on a password-reset request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetClaims {
    pub user_id: i64,
    pub email: String,
    pub exp: u64,
    pub iss: String,
}

impl TokenClaims for SessionClaims {
    const KIND: TokenKind = TokenKind::Session;

    fn user_id(&self) -> i64 {
        self.user_id
    }

    fn expires_at(&self) -> u64 {
        self.exp
    }
}

impl TokenClaims for VerificationClaims {
    const KIND: TokenKind = TokenKind::Verification;

    fn user_id(&self) -> i64 {
        self.user_id
    }

    fn expires_at(&self) -> u64 {
        self.exp
    }
}

impl TokenClaims for PasswordResetClaims {
    const KIND: TokenKind = TokenKind::PasswordReset;

    fn user_id(&self) -> i64 {
        self.user_id
    }

    fn expires_at(&self) -> u64 {
        self.exp
    }
}
