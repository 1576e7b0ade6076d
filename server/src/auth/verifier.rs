use std::sync::Arc;

use jsonwebtoken::{Algorithm, Validation, decode};
use tracing::debug;

use cc_shared::types::TokenClaims;

use super::error::TokenError;
use super::keys::TokenKeys;
use super::settings::AuthSettings;

/// Pure signature/expiry check. Never touches the store.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    keys: Arc<TokenKeys>,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(keys: Arc<TokenKeys>, settings: &AuthSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_issuer(&[settings.issuer.as_str()]);
        Self { keys, validation }
    }

    /// Decode `raw` as claims of shape `C`, checked against the secret bound
    /// to `C::KIND`.
    pub fn verify<C: TokenClaims>(&self, raw: &str) -> Result<C, TokenError> {
        let data = decode::<C>(raw, self.keys.decoding(C::KIND), &self.validation)?;
        debug!(
            "{} token for user {} valid until {}",
            C::KIND,
            data.claims.user_id(),
            data.claims.expires_at()
        );
        Ok(data.claims)
    }
}
