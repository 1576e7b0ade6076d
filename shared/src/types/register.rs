use serde::Deserialize;

/// Body of `POST /api/user/verify`; the token comes from the mailed link.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}
