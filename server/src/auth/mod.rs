//! Token issuance and verification, the authorization gate, the account
//! lifecycle flows and the privilege guard.

pub mod error;
pub mod flows;
pub mod gate;
pub mod guard;
pub mod issuer;
pub mod keys;
pub mod password;
pub mod settings;
pub mod verifier;

pub use error::{AuthError, ErrorCategory, SigningError, TokenError};
pub use flows::Flows;
pub use gate::{AuthContext, Gate};
pub use guard::PrivilegeGuard;
pub use issuer::TokenIssuer;
pub use keys::TokenKeys;
pub use settings::AuthSettings;
pub use verifier::TokenVerifier;
