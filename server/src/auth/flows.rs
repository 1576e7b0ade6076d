use std::sync::Arc;

use tracing::{debug, error, info, warn};

use cc_shared::types::login::{normalize_email, validate_password};
use cc_shared::types::{
    AccessLevel, CredentialError, Credentials, PasswordResetClaims, SessionClaims,
    VerificationClaims,
};

use super::error::AuthError;
use super::issuer::TokenIssuer;
use super::password::{hash_password, verify_password};
use super::settings::AuthSettings;
use super::verifier::TokenVerifier;
use crate::database::{Account, AccountStore, StoreError};
use crate::notifier::{Mail, Notifier};

/// Account lifecycle: register, verify, login and the two halves of a
/// password reset.
#[derive(Clone)]
pub struct Flows {
    store: Arc<dyn AccountStore>,
    notifier: Arc<dyn Notifier>,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    settings: Arc<AuthSettings>,
}

impl Flows {
    pub fn new(
        store: Arc<dyn AccountStore>,
        notifier: Arc<dyn Notifier>,
        issuer: TokenIssuer,
        verifier: TokenVerifier,
        settings: Arc<AuthSettings>,
    ) -> Self {
        Self {
            store,
            notifier,
            issuer,
            verifier,
            settings,
        }
    }

    /// Create an unverified account and mail its verification link.
    ///
    /// The first account in an empty store becomes Admin; everyone after is
    /// User. No session token is handed out until the account is verified.
    pub async fn register(&self, credentials: &Credentials) -> Result<Account, AuthError> {
        credentials.validate()?;
        let email = credentials.normalized_email();
        let password_hash = hash_password(&credentials.password)?;

        let account = self
            .store
            .create_bootstrapping(&email, &password_hash)
            .await
            .map_err(|e| match e {
                StoreError::DuplicateEmail => AuthError::AlreadyExists,
                other => AuthError::Store(other),
            })?;
        if account.access_level == AccessLevel::ADMIN {
            info!("Store was empty, created admin user {}", account.email);
        }

        let token = self.issuer.issue_verification(&account)?;
        self.notify(Mail::verification(
            &account.email,
            &self.settings.verify_link(&token),
        ))
        .await;

        info!("Registered user {} ({})", account.id, account.email);
        Ok(account)
    }

    /// Mark the account named by a verification token as verified.
    ///
    /// The stored id, email and access level must all still match the
    /// claims. Verifying twice is a no-op.
    pub async fn verify(&self, raw_token: &str) -> Result<(), AuthError> {
        let claims: VerificationClaims = self.verifier.verify(raw_token).map_err(|e| {
            warn!("Verification token rejected: {}", e);
            AuthError::InvalidToken("verification token failed verification")
        })?;

        let account = self
            .store
            .get_by_id(claims.user_id)
            .await?
            .ok_or(AuthError::InvalidToken("no account for verification token"))?;

        if account.email != claims.email || account.access_level != claims.access_level {
            warn!(
                "Verification claims for user {} no longer match the stored account",
                account.id
            );
            return Err(AuthError::InvalidToken("claims do not match account"));
        }

        if account.verified {
            debug!("User {} already verified", account.id);
            return Ok(());
        }

        self.store.set_verified(account.id).await?;
        info!("User {} verified", account.id);
        Ok(())
    }

    /// Exchange valid credentials of a verified account for a session token.
    ///
    /// Banned accounts can still log in; the gate stops them on the next
    /// protected call.
    pub async fn login(&self, credentials: &Credentials) -> Result<String, AuthError> {
        credentials.validate()?;
        let email = credentials.normalized_email();

        let account = self
            .store
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::NotFound)?;

        if !account.verified {
            return Err(AuthError::NotVerified);
        }

        if !verify_password(&account.password_hash, &credentials.password)? {
            return Err(AuthError::InvalidCredentials(
                CredentialError::PasswordMismatch,
            ));
        }

        let token = self.issuer.issue_session(&account)?;
        info!("User {} logged in", account.id);
        Ok(token)
    }

    /// Mail a password reset link. Only one reset may be outstanding per
    /// account; the flag clears when the password is changed.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email);
        let account = self
            .store
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::NotFound)?;

        if account.change_password_requested {
            return Err(AuthError::AlreadyRequested);
        }

        // Sign first: a signing failure must not leave the flag raised.
        let token = self.issuer.issue_password_reset(&account)?;
        self.store
            .set_change_password_requested(account.id, true)
            .await?;

        self.notify(Mail::password_reset(
            &account.email,
            &self.settings.reset_link(&token),
        ))
        .await;

        info!("Password reset requested for user {}", account.id);
        Ok(())
    }

    /// Set a new password using a reset token.
    pub async fn complete_password_reset(
        &self,
        raw_token: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let claims: PasswordResetClaims = self.verifier.verify(raw_token).map_err(|e| {
            warn!("Password reset token rejected: {}", e);
            AuthError::InvalidToken("reset token failed verification")
        })?;

        validate_password(new_password)?;

        let account = self
            .store
            .get_by_id(claims.user_id)
            .await?
            .ok_or(AuthError::InvalidToken("no account for reset token"))?;

        if account.email != claims.email {
            warn!("Reset token email no longer matches user {}", account.id);
            return Err(AuthError::InvalidToken("claims do not match account"));
        }

        let password_hash = hash_password(new_password)?;
        self.store.set_password(account.id, &password_hash).await?;

        info!("Password changed for user {}", account.id);
        Ok(())
    }

    /// Whether `raw_token` is a currently valid session token. Signature and
    /// expiry only; the store is not consulted.
    pub fn check_authenticated(&self, raw_token: &str) -> bool {
        match self.verifier.verify::<SessionClaims>(raw_token) {
            Ok(_) => true,
            Err(e) => {
                debug!("Session check failed: {}", e);
                false
            }
        }
    }

    async fn notify(&self, mail: Mail) {
        let to = mail.to.clone();
        if let Err(e) = self.notifier.send(mail).await {
            error!("Failed to send mail to {}: {}", to, e);
        }
    }
}
