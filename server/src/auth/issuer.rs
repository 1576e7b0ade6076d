use std::sync::Arc;

use jsonwebtoken::{Algorithm, Header, encode, get_current_timestamp};
use tracing::debug;

use cc_shared::types::{PasswordResetClaims, SessionClaims, TokenClaims, VerificationClaims};

use super::error::SigningError;
use super::keys::TokenKeys;
use super::settings::AuthSettings;
use crate::database::Account;

/// Mints the three token kinds from account data.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    keys: Arc<TokenKeys>,
    issuer: String,
    validity_secs: u64,
}

impl TokenIssuer {
    pub fn new(keys: Arc<TokenKeys>, settings: &AuthSettings) -> Self {
        Self {
            keys,
            issuer: settings.issuer.clone(),
            validity_secs: settings.token_validity_secs,
        }
    }

    /// Sign `claims` with the secret bound to `C::KIND`.
    pub fn issue<C: TokenClaims>(&self, claims: &C) -> Result<String, SigningError> {
        let token = encode(
            &Header::new(Algorithm::HS256),
            claims,
            self.keys.encoding(C::KIND),
        )
        .map_err(|source| SigningError {
            kind: C::KIND,
            source,
        })?;
        debug!("Issued {} token for user {}", C::KIND, claims.user_id());
        Ok(token)
    }

    pub fn issue_session(&self, account: &Account) -> Result<String, SigningError> {
        self.issue_session_at(account, get_current_timestamp())
    }

    pub fn issue_session_at(&self, account: &Account, now: u64) -> Result<String, SigningError> {
        self.issue(&SessionClaims {
            user_id: account.id,
            access_level: account.access_level,
            exp: self.expiry(now),
            iss: self.issuer.clone(),
        })
    }

    /// The claims capture the access level as of now; verification later
    /// requires it to be unchanged.
    pub fn issue_verification(&self, account: &Account) -> Result<String, SigningError> {
        self.issue_verification_at(account, get_current_timestamp())
    }

    pub fn issue_verification_at(
        &self,
        account: &Account,
        now: u64,
    ) -> Result<String, SigningError> {
        self.issue(&VerificationClaims {
            user_id: account.id,
            email: account.email.clone(),
            access_level: account.access_level,
            exp: self.expiry(now),
            iss: self.issuer.clone(),
        })
    }

    pub fn issue_password_reset(&self, account: &Account) -> Result<String, SigningError> {
        self.issue_password_reset_at(account, get_current_timestamp())
    }

    pub fn issue_password_reset_at(
        &self,
        account: &Account,
        now: u64,
    ) -> Result<String, SigningError> {
        self.issue(&PasswordResetClaims {
            user_id: account.id,
            email: account.email.clone(),
            exp: self.expiry(now),
            iss: self.issuer.clone(),
        })
    }

    fn expiry(&self, now: u64) -> u64 {
        now.saturating_add(self.validity_secs)
    }
}
