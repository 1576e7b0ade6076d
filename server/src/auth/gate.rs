use std::sync::Arc;

use http::Request;
use http::header::{AUTHORIZATION, HeaderMap};
use tracing::{debug, error, warn};

use cc_shared::types::{AccessLevel, SessionClaims};

use super::error::AuthError;
use super::verifier::TokenVerifier;
use crate::database::AccountStore;

/// Who is calling, as established by the gate. Placed in the request
/// extensions of every admitted non-open request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i64,
    /// Level read fresh from the store, not the one in the token.
    pub access_level: AccessLevel,
}

/// Authorization check run in front of every protected operation.
#[derive(Clone)]
pub struct Gate {
    verifier: TokenVerifier,
    store: Arc<dyn AccountStore>,
}

impl Gate {
    pub fn new(verifier: TokenVerifier, store: Arc<dyn AccountStore>) -> Self {
        Self { verifier, store }
    }

    /// Admit or reject a caller for an operation declared at `required`.
    ///
    /// `Ok(None)` means the operation is open and no token was looked at.
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        required: AccessLevel,
    ) -> Result<Option<AuthContext>, AuthError> {
        if required == AccessLevel::DEFAULT {
            return Ok(None);
        }

        let token = bearer_token(headers)?;

        let claims: SessionClaims = self.verifier.verify(token).map_err(|e| {
            warn!("Session token rejected: {}", e);
            AuthError::NotAuthenticated("session token failed verification")
        })?;

        let account = match self.store.get_by_id(claims.user_id).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                warn!("Session token for unknown user {}", claims.user_id);
                return Err(AuthError::NotAuthenticated("no account for token subject"));
            }
            Err(e) => {
                error!("Account lookup failed during authorization: {}", e);
                return Err(AuthError::Store(e));
            }
        };

        if account.access_level.is_banned() {
            warn!("Banned user {} rejected", account.id);
            return Err(AuthError::Banished);
        }

        if !account.access_level.admits(required) {
            warn!(
                "User {} at {} denied, {} required",
                account.id, account.access_level, required
            );
            return Err(AuthError::AccessDenied);
        }

        debug!("User {} admitted at {}", account.id, account.access_level);
        Ok(Some(AuthContext {
            user_id: account.id,
            access_level: account.access_level,
        }))
    }

    /// [`Gate::authorize`], then attach the resulting context to `req`.
    pub async fn authorize_request<B>(
        &self,
        req: &mut Request<B>,
        required: AccessLevel,
    ) -> Result<Option<AuthContext>, AuthError> {
        let context = self.authorize(req.headers(), required).await?;
        if let Some(context) = context {
            req.extensions_mut().insert(context);
        }
        Ok(context)
    }
}

/// Pull the token out of an `Authorization: <scheme> <token>` header.
/// The scheme itself is not checked.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = match headers.get(AUTHORIZATION) {
        None => return Err(AuthError::MissingToken),
        Some(v) if v.is_empty() => return Err(AuthError::MissingToken),
        Some(v) => v.to_str().map_err(|_| AuthError::MalformedHeader)?,
    };

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [_scheme, token] => Ok(*token),
        _ => Err(AuthError::MalformedHeader),
    }
}

#[cfg(test)]
mod tests {
    use http::header::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn two_part_header_yields_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn scheme_is_not_inspected() {
        assert_eq!(bearer_token(&headers("Token xyz")).unwrap(), "xyz");
    }

    #[test]
    fn missing_header_is_missing_token() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            bearer_token(&headers("")),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn wrong_part_count_is_malformed() {
        for value in ["abc", "Bearer a b", "Bearer  abc"] {
            assert!(
                matches!(bearer_token(&headers(value)), Err(AuthError::MalformedHeader)),
                "{value}"
            );
        }
    }
}
