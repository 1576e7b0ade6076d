use thiserror::Error;

use cc_shared::types::{CredentialError, TokenKind};

use crate::database::StoreError;

/// Failure to parse or validate a signed token.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(jsonwebtoken::errors::Error),

    #[error("token signature does not match")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed(err),
        }
    }
}

#[derive(Error, Debug)]
#[error("failed to sign {kind} token: {source}")]
pub struct SigningError {
    pub kind: TokenKind,
    #[source]
    pub source: jsonwebtoken::errors::Error,
}

/// Coarse classification used for status mapping and log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Authentication,
    Authorization,
    Conflict,
    Internal,
}

/// Every failure the auth core can hand back to a caller.
///
/// `Display` carries the full cause for server-side logs; callers only ever
/// see [`AuthError::public_message`].
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid credentials: {0}")]
    InvalidCredentials(CredentialError),

    #[error("invalid request body: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("missing authorization header")]
    MissingToken,

    #[error("authorization header is not '<scheme> <token>'")]
    MalformedHeader,

    #[error("not authenticated: {0}")]
    NotAuthenticated(&'static str),

    #[error("invalid token: {0}")]
    InvalidToken(&'static str),

    #[error("no account with that email")]
    NotFound,

    #[error("account has not been verified")]
    NotVerified,

    #[error("account is banned")]
    Banished,

    #[error("access level too low")]
    AccessDenied,

    #[error("actor and target are the same account")]
    CannotActOnSelf,

    #[error("target is not strictly below the actor")]
    InsufficientPrivilege,

    #[error("admin cannot be granted through this path")]
    CannotGrantAdmin,

    #[error("email address already registered")]
    AlreadyExists,

    #[error("password reset already requested")]
    AlreadyRequested,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("account {0} vanished from the store")]
    AccountMissing(i64),
}

impl From<CredentialError> for AuthError {
    fn from(err: CredentialError) -> Self {
        AuthError::InvalidCredentials(err)
    }
}

impl AuthError {
    pub fn category(&self) -> ErrorCategory {
        use AuthError::*;

        match self {
            InvalidCredentials(CredentialError::PasswordMismatch) => ErrorCategory::Authentication,
            InvalidCredentials(_) | InvalidRequest(_) | MalformedHeader => {
                ErrorCategory::Validation
            }
            MissingToken | NotAuthenticated(_) | InvalidToken(_) | NotFound | NotVerified => {
                ErrorCategory::Authentication
            }
            Banished | AccessDenied | CannotActOnSelf | InsufficientPrivilege
            | CannotGrantAdmin => ErrorCategory::Authorization,
            AlreadyExists | AlreadyRequested | Store(StoreError::DuplicateEmail) => {
                ErrorCategory::Conflict
            }
            Store(_) | Signing(_) | PasswordHash(_) | AccountMissing(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// Fixed text safe to return to the caller.
    pub fn public_message(&self) -> &'static str {
        use AuthError::*;

        match self {
            InvalidCredentials(CredentialError::InvalidEmail) => "Invalid email address",
            InvalidCredentials(CredentialError::PasswordTooShort) => {
                "Password must be at least 8 characters"
            }
            InvalidCredentials(CredentialError::PasswordMismatch) => "Invalid email or password",
            InvalidRequest(_) => "Invalid request body",
            MissingToken => "Authorization required",
            MalformedHeader => "Malformed authorization header",
            NotAuthenticated(_) => "Not authenticated",
            InvalidToken(_) => "Invalid or expired token",
            NotFound => "User not found",
            NotVerified => "Account not verified",
            Banished => "Account is banned",
            AccessDenied => "Access denied",
            CannotActOnSelf => "Cannot perform this action on yourself",
            InsufficientPrivilege => "Insufficient privilege",
            CannotGrantAdmin => "Admin level cannot be granted",
            AlreadyExists | Store(StoreError::DuplicateEmail) => "User already exists",
            AlreadyRequested => "Password change already requested",
            Store(_) | Signing(_) | PasswordHash(_) | AccountMissing(_) => "Internal server error",
        }
    }

    pub fn is_internal(&self) -> bool {
        self.category() == ErrorCategory::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwt_error_kinds_map_to_token_errors() {
        use jsonwebtoken::errors::{Error, ErrorKind};

        assert!(matches!(
            TokenError::from(Error::from(ErrorKind::ExpiredSignature)),
            TokenError::Expired
        ));
        assert!(matches!(
            TokenError::from(Error::from(ErrorKind::InvalidSignature)),
            TokenError::InvalidSignature
        ));
        assert!(matches!(
            TokenError::from(Error::from(ErrorKind::InvalidToken)),
            TokenError::Malformed(_)
        ));
    }

    #[test]
    fn wrong_password_is_authentication_but_bad_format_is_validation() {
        assert_eq!(
            AuthError::from(CredentialError::PasswordMismatch).category(),
            ErrorCategory::Authentication
        );
        assert_eq!(
            AuthError::from(CredentialError::PasswordTooShort).category(),
            ErrorCategory::Validation
        );
    }

    #[test]
    fn guard_failures_are_authorization_errors() {
        for err in [
            AuthError::Banished,
            AuthError::AccessDenied,
            AuthError::CannotActOnSelf,
            AuthError::InsufficientPrivilege,
            AuthError::CannotGrantAdmin,
        ] {
            assert_eq!(err.category(), ErrorCategory::Authorization, "{err}");
        }
    }

    #[test]
    fn internal_errors_never_leak_their_cause() {
        let err = AuthError::PasswordHash("salt exploded at 0xdeadbeef".into());
        assert!(err.is_internal());
        assert_eq!(err.public_message(), "Internal server error");
        assert!(err.to_string().contains("0xdeadbeef"));
    }

    #[test]
    fn duplicate_email_from_store_is_a_conflict() {
        let err = AuthError::from(StoreError::DuplicateEmail);
        assert_eq!(err.category(), ErrorCategory::Conflict);
        assert_eq!(err.public_message(), "User already exists");
    }
}
