use std::fmt;

use serde::Deserialize;

/// Asks for a reset link to be mailed to `email`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

/// Completes a reset with the token from the mailed link.
#[derive(Clone, Deserialize)]
pub struct ChangePasswordRequest {
    pub token: String,
    pub password: String,
}

impl fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswordRequest")
            .field("token", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}
