use serde::{Deserialize, Serialize};

use super::access_level::AccessLevel;

/// Ban / unban body: the account being acted on.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TargetRequest {
    pub id: i64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAccessLevelRequest {
    pub id: i64,
    pub access_level: AccessLevel,
}

/// Public view of an account; never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: i64,
    pub email: String,
    pub access_level: AccessLevel,
    pub verified: bool,
}
