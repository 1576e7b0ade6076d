use std::fmt;

use jsonwebtoken::{DecodingKey, EncodingKey};

use cc_shared::types::TokenKind;

use super::settings::AuthSettings;

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// One HMAC key pair per token kind. Issuer and verifier both select keys
/// through here, so a token can only ever be checked against the secret of
/// the kind it claims to be.
pub struct TokenKeys {
    session: KeyPair,
    verification: KeyPair,
    reset: KeyPair,
}

impl TokenKeys {
    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self {
            session: KeyPair::from_secret(settings.secret(TokenKind::Session)),
            verification: KeyPair::from_secret(settings.secret(TokenKind::Verification)),
            reset: KeyPair::from_secret(settings.secret(TokenKind::PasswordReset)),
        }
    }

    fn pair(&self, kind: TokenKind) -> &KeyPair {
        match kind {
            TokenKind::Session => &self.session,
            TokenKind::Verification => &self.verification,
            TokenKind::PasswordReset => &self.reset,
        }
    }

    pub fn encoding(&self, kind: TokenKind) -> &EncodingKey {
        &self.pair(kind).encoding
    }

    pub fn decoding(&self, kind: TokenKind) -> &DecodingKey {
        &self.pair(kind).decoding
    }
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenKeys(<redacted>)")
    }
}
