use serde::{Deserialize, Serialize};

/// `{error?: string}` envelope returned by operations that carry no data.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn ok() -> Self {
        Self { error: None }
    }

    pub fn new(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
        }
    }
}
